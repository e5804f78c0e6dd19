// Domain layer module exports
// Entities and persistence ports; no infrastructure concerns here

pub mod contact;
pub mod photo;
pub mod profile;
pub mod repositories;
pub mod status;
pub mod testimonial;
pub mod timestamp;

pub use contact::{ContactInquiry, Email, InquiryStatus, NewInquiry};
pub use photo::{NewPhoto, Photo, PhotoUpdate};
pub use profile::{AboutProfile, AboutProfileUpdate};
pub use status::{NewStatusCheck, StatusCheck};
pub use testimonial::{NewTestimonial, Testimonial};
