/// Router Module Index
///
/// Organizes the application's routing into security-segregated modules.
/// Two enforcement layers apply on top of this structure: the router-wide
/// route guard (static role table → redirect) and the authentication layer
/// on the protected modules (session required → 401).

/// Routes accessible to any client (health probe only).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware: form
/// preparation, entity mutations, and the role landing endpoints.
pub mod authenticated;

/// Routes restricted to the 'admin' role, nested under `/admin`.
pub mod admin;
