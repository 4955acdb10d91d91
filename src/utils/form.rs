pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Invalid email address.";
pub const PASSWORDS_DIFFER: &str = "Field must be equal to password.";

/// Validation errors of a submitted form, by field name
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn too_long(max: usize) -> String {
    format!("Field cannot be longer than {max} characters.")
}
