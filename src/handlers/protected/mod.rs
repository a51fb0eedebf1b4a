// handlers/protected/mod.rs - endpoints behind the login gate
//
// Handlers here receive `Extension<CurrentUser>` from the gate. Every
// mutation goes through `auth::authorize_task` first.

pub mod tasks;
