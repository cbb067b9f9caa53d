pub mod basic;
pub mod gutter;
pub mod scrolling;
pub mod search;
pub mod tabs;
