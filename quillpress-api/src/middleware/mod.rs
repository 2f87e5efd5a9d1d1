/// Middleware modules for the API server
///
/// Authentication is a per-route `from_fn_with_state` layer in `app`; this
/// module holds the tower layers applied to every response.

pub mod security;
