//! OCRA Client - HTTP client for the generative AI backend.
//!
//! This crate provides [`GeminiClient`], an implementation of
//! [`ocra_core::GenerativeBackend`] on top of Google's Gemini
//! `generateContent` API.
//!
//! # Overview
//!
//! The client handles authentication, request building, response parsing,
//! and error classification.

pub mod gemini;

pub use gemini::GeminiClient;
