mod common;
mod drafts;
mod entries;
