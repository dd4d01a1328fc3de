//! Unit tests for the harvest context, mocked with wiremock
