//! Rules for the names that can appear in trees and refs.

mod file_mode;
pub use file_mode::FileMode;

mod path_mode;
pub use path_mode::PathMode;

mod path_segment;
pub use path_segment::{PathSegment, PathSegmentError};

mod ref_name;
pub use ref_name::check_ref_name;
