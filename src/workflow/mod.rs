//! User-facing workflows
pub mod add_product;
pub mod form;

pub use add_product::{AddProductWorkflow, FormField, Submission, AUTO_FOCUSED_FIELD};
pub use form::{parse_delivery_date, validate_product_form, FieldViolation, FormValidation, ProductForm, ValidProductForm};
