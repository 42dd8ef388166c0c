// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across GiveLink

// Server
pub const GIVELINK_HOST: &str = "GIVELINK_HOST";
pub const GIVELINK_PORT: &str = "GIVELINK_PORT";
pub const PORT: &str = "PORT"; // Legacy

// Storage
pub const GIVELINK_DATABASE_PATH: &str = "GIVELINK_DATABASE_PATH";

// CORS Configuration
pub const GIVELINK_CORS_ORIGIN: &str = "GIVELINK_CORS_ORIGIN";
pub const CORS_ORIGIN: &str = "CORS_ORIGIN"; // Legacy

// Authentication
pub const JWT_SECRET: &str = "JWT_SECRET";
pub const GIVELINK_ADMIN_TOKEN: &str = "GIVELINK_ADMIN_TOKEN";
pub const SECURE_COOKIES: &str = "SECURE_COOKIES";

// Security Headers
pub const SECURITY_HEADERS_ENABLED: &str = "SECURITY_HEADERS_ENABLED";
pub const ENABLE_HSTS: &str = "ENABLE_HSTS";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";
