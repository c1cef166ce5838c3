//! Shareable links that open the attendance form for a token.

use url::Url;

use super::TokenValue;

/// Frontend base URL used to build registration links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationLinkBase(Url);

impl RegistrationLinkBase {
    /// Parse an absolute base URL such as `https://comedor.example.org/app`.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Url::parse(raw.trim()).map(Self)
    }

    /// Fully-qualified link for `token`.
    ///
    /// # Examples
    /// ```
    /// use comedor_backend::domain::{RegistrationLinkBase, TokenValue};
    /// use uuid::Uuid;
    ///
    /// let base = RegistrationLinkBase::parse("https://comedor.example.org/").unwrap();
    /// let link = base.link_for(TokenValue::from_uuid(Uuid::nil()));
    /// assert_eq!(
    ///     link,
    ///     "https://comedor.example.org/asistencias/registro/00000000-0000-0000-0000-000000000000"
    /// );
    /// ```
    pub fn link_for(&self, token: TokenValue) -> String {
        format!(
            "{}/asistencias/registro/{token}",
            self.0.as_str().trim_end_matches('/')
        )
    }
}
