//! Bearer credential attachment.

use lumen_domain::RequestSpec;

use super::TokenStore;

const AUTHORIZATION: &str = "Authorization";

/// Attaches the current access token to outgoing requests.
///
/// Attachment is unconditional on validity: an expired token still goes on
/// the wire and the server's 401 drives the refresh protocol. With no
/// stored credentials the request proceeds unauthenticated; that is not an
/// error here; the server rejects it if the endpoint requires auth.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    tokens: TokenStore,
    scheme: String,
}

impl RequestAuthenticator {
    /// Creates an authenticator using the given scheme (e.g. `"Bearer"`).
    #[must_use]
    pub fn new(tokens: TokenStore, scheme: impl Into<String>) -> Self {
        Self {
            tokens,
            scheme: scheme.into(),
        }
    }

    /// Returns the request with the `Authorization` header attached.
    ///
    /// A caller-provided `Authorization` header is left untouched. A
    /// storage read failure is logged and the request proceeds
    /// unauthenticated.
    pub async fn apply(&self, request: RequestSpec) -> RequestSpec {
        if request.header(AUTHORIZATION).is_some() {
            return request;
        }

        match self.tokens.get().await {
            Ok(Some(credentials)) => request.with_header(
                AUTHORIZATION,
                credentials.authorization_header(&self.scheme),
            ),
            Ok(None) => request,
            Err(error) => {
                tracing::warn!(%error, "credential read failed; sending request unauthenticated");
                request
            }
        }
    }
}
