pub mod api; // POST /api/register, POST /api/login, GET /api/logout
pub mod web; // GET/POST /register, GET/POST /login, GET /logout
