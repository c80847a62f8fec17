pub mod open_router_service;
