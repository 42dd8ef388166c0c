// ABOUTME: Unit and router tests for the server library
// ABOUTME: Configuration parsing plus health, CORS and header behaviour of the assembled app

mod router_tests;
