pub mod charts;
pub mod gauge;
pub mod legend;
pub mod popup;
pub mod tables;
