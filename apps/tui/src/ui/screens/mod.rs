pub mod district;
pub mod overview;
pub mod target_area;
