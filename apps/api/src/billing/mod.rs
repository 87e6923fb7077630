// Money helpers shared by quotations and the sibling documents
// (salary slips, worksheets) that only need totals and words.

pub mod totals;
pub mod words;
