mod api_sites_router;
mod integration_site_service;
mod unit_markdown_parser;
mod unit_sqlite_database;
