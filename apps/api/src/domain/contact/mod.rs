// Contact inquiries submitted by prospective clients

pub mod inquiry;
pub mod value_objects;

pub use inquiry::{ContactInquiry, NewInquiry};
pub use value_objects::{Email, InquiryStatus};
