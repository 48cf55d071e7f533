mod appointments_test;
mod auth_test;
mod availability_test;
mod middleware_test;
mod routes_test;
