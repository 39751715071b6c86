pub mod box_filter;
pub mod guided;
pub mod resize;
