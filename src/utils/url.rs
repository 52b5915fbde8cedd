//! URL joining for upstream tool servers.

/// Strip trailing slashes so a path can be appended without doubling them.
///
/// # Examples
///
/// ```
/// use coders::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:4001/"), "http://127.0.0.1:4001");
/// assert_eq!(normalize_base_url("http://127.0.0.1:4001/mcp//"), "http://127.0.0.1:4001/mcp");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join an upstream base URL with a request path (which may carry a query).
///
/// An empty or root path yields the base with a single trailing slash, so a
/// request to the bare mount prefix reaches the upstream root.
///
/// # Examples
///
/// ```
/// use coders::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://127.0.0.1:4001/", "/tools/call?id=1"),
///     "http://127.0.0.1:4001/tools/call?id=1"
/// );
/// assert_eq!(construct_api_url("http://127.0.0.1:4001", "/"), "http://127.0.0.1:4001/");
/// ```
pub fn construct_api_url(base_url: &str, path: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    format!("{normalized_base}/{path}")
}
