//! Dynamic capability registration

use super::{Content, JsonKind, Validator};
use crate::lsp::error::LspError;
use crate::lsp::identifier::field;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One capability the server asks the client to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Id used to unregister the capability again
    pub id: String,

    /// Method the registration is for, e.g. `textDocument/willSaveWaitUntil`
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_options: Option<Value>,
}

impl Registration {
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            register_options: None,
        }
    }

    pub fn with_register_options(mut self, options: Value) -> Self {
        self.register_options = Some(options);
        self
    }
}

impl Content for Registration {
    const NAME: &'static str = "Registration";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::ID, JsonKind::String)?
            .required(field::METHOD, JsonKind::String)?
            .optional(field::REGISTER_OPTIONS, JsonKind::Object)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationParams {
    pub registrations: Vec<Registration>,
}

impl RegistrationParams {
    pub fn new(registrations: Vec<Registration>) -> Self {
        Self { registrations }
    }
}

impl Content for RegistrationParams {
    const NAME: &'static str = "RegistrationParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?.required_array_of::<Registration>(field::REGISTRATIONS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unregistration {
    pub id: String,
    pub method: String,
}

impl Unregistration {
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
        }
    }
}

impl Content for Unregistration {
    const NAME: &'static str = "Unregistration";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required(field::ID, JsonKind::String)?
            .required(field::METHOD, JsonKind::String)?;
        Ok(())
    }
}

/// Parameters of `client/unregisterCapability`
///
/// The wire key keeps the protocol's historical spelling `unregisterations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregistrationParams {
    pub unregisterations: Vec<Unregistration>,
}

impl UnregistrationParams {
    pub fn new(unregisterations: Vec<Unregistration>) -> Self {
        Self { unregisterations }
    }
}

impl Content for UnregistrationParams {
    const NAME: &'static str = "UnregistrationParams";

    fn validate(data: &Value) -> Result<(), LspError> {
        Validator::object(Self::NAME, data)?
            .required_array_of::<Unregistration>(field::UNREGISTERATIONS)?;
        Ok(())
    }
}
