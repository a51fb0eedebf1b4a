// handlers/public/mod.rs - endpoints reachable without a session
//
// Registration, login and logout for both surfaces. Successful register and
// login bind the session to the user; logout always clears it.

pub mod auth;
