//! Query string helper
//!
//! The path returned here is both signed and requested, so query parameters
//! must be attached before the request reaches the dispatcher.

use crate::error::{RestError, RestResult};
use serde::Serialize;

/// Append a URL-encoded query string to `path`
///
/// `options` can be anything `serde_urlencoded` accepts: a map, a slice of
/// pairs, or a struct of scalars. Pairs are emitted in iteration order.
/// When `options` is `None` or encodes to nothing, `path` is returned as is.
///
/// ```
/// use coinbase_rest::with_query;
///
/// let path = with_query("orders", Some(&[("status", "open")][..])).unwrap();
/// assert_eq!(path, "orders?status=open");
/// ```
pub fn with_query<Q: Serialize + ?Sized>(path: &str, options: Option<&Q>) -> RestResult<String> {
    let Some(options) = options else {
        return Ok(path.to_string());
    };

    let query = serde_urlencoded::to_string(options)
        .map_err(|e| RestError::InvalidParameter(e.to_string()))?;

    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, query))
    }
}
