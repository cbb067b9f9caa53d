//! Interactive search: the match index and previous/next navigation

pub mod index;
pub mod navigation;
