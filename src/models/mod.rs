//! Data models module
//!
//! This module contains all data structures exchanged with the LMS backend

pub mod user;
pub mod profile;
pub mod course;
pub mod order;

// Re-export commonly used models
pub use user::{SessionUser, UserStatus, LoginRequest, LoginResponse};
pub use profile::{ExtendedProfile, ProfileForm, CreateProfileRequest};
pub use course::{Course, CourseClass, Enrollment, CreateEnrollmentRequest};
pub use order::{Bucket, OrderableItem, Order, OrderLine, OrderStatus, CreateOrderRequest, ShippingLabel};
