//! Integration tests for docs-companion-lsp

use docs_companion_lsp::config::NpmRegistryConfig;
use docs_companion_lsp::docs::DocKind;
use docs_companion_lsp::imports::extract_imports;
use docs_companion_lsp::manifest::{DEFAULT_MANIFEST_FILE, DependencyManifest};
use docs_companion_lsp::registries::FETCH_FAILED_MESSAGE;
use docs_companion_lsp::registries::http_client::create_shared_client;
use docs_companion_lsp::registries::npm::NpmRegistry;
use docs_companion_lsp::render::render_doc_html;
use docs_companion_lsp::resolver::DocsResolver;
use docs_companion_lsp::sink::UpdateDocParams;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry_for(server: &MockServer) -> NpmRegistry {
    let config = NpmRegistryConfig {
        url: server.uri(),
        ..Default::default()
    };
    NpmRegistry::with_client_and_config(create_shared_client(None).unwrap(), &config)
}

async fn project_manifest(content: &str) -> (tempfile::TempDir, Option<DependencyManifest>) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(DEFAULT_MANIFEST_FILE), content).unwrap();
    let manifest = DependencyManifest::load_from_root(dir.path(), DEFAULT_MANIFEST_FILE).await;
    (dir, manifest)
}

/// Test extraction over a realistic TypeScript module
#[test]
fn test_extract_realistic_module() {
    let source = r#"
import React, { useState } from "react";
import { createRoot } from "react-dom/client";
import type { AxiosInstance } from 'axios';
import { useQuery } from "@tanstack/react-query";
import styles from "./App.module.css";
import { helper } from "../utils/helper";
import left from "left-pad";
import leftFoo from "left-pad/foo";
import sub from "@scope/pkg/sub";

const express = require("express");
const path = require('path');
const local = require("./local");
"#;

    assert_eq!(
        extract_imports(source),
        vec![
            "react",
            "react-dom",
            "axios",
            "@tanstack/react-query",
            "left-pad",
            "@scope/pkg",
            "express",
            "path",
        ]
    );
}

/// Declared dependency resolved through the registry
#[tokio::test]
async fn test_declared_dependency_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/left-pad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "d",
            "readme": "r",
            "homepage": "h"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, manifest) = project_manifest(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#).await;
    assert!(manifest.is_some());
    let resolver = DocsResolver::new(manifest, registry_for(&server));

    let doc = resolver.resolve("left-pad", "javascript").await;
    assert_eq!(doc.kind, DocKind::NpmPackage);
    assert_eq!(doc.title, "left-pad (^1.0.0)");
    assert!(doc.content.starts_with("**Description:** d"));
    assert_eq!(doc.source.as_deref(), Some("npm registry"));

    let urls: Vec<&str> = doc.links().iter().map(|l| l.url.as_str()).collect();
    assert!(urls.contains(&"https://www.npmjs.com/package/left-pad"));
    assert!(urls.contains(&"h"));
}

/// Declared dependency whose fetch fails
#[tokio::test]
async fn test_declared_dependency_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/left-pad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (_dir, manifest) = project_manifest(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#).await;
    let resolver = DocsResolver::new(manifest, registry_for(&server));

    let doc = resolver.resolve("left-pad", "javascript").await;
    assert_eq!(doc.kind, DocKind::NpmPackage);
    assert_eq!(doc.title, "left-pad (^1.0.0)");
    assert_eq!(doc.content, FETCH_FAILED_MESSAGE);
    assert!(doc.links.is_none());
}

/// Builtins resolve without touching the registry
#[tokio::test]
async fn test_builtin_without_manifest_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, manifest) = project_manifest(r#"{"dependencies": {"left-pad": "^1.0.0"}}"#).await;
    let resolver = DocsResolver::new(manifest, registry_for(&server));

    let doc = resolver.resolve("Promise", "typescript").await;
    assert_eq!(doc.kind, DocKind::Builtin);
    assert!(doc.links().iter().any(|l| l.url.contains("Promise")));
}

/// Unresolvable symbol with an invalid manifest on disk
#[tokio::test]
async fn test_unknown_with_broken_manifest() {
    let server = MockServer::start().await;
    let (_dir, manifest) = project_manifest("{ this is not json").await;
    assert!(manifest.is_none());

    let resolver = DocsResolver::new(manifest, registry_for(&server));
    let doc = resolver.resolve("left-pad", "javascript").await;
    assert_eq!(doc.kind, DocKind::Unknown);
    assert!(doc.links.is_none());
    assert!(doc.source.is_none());
}

/// Contextual resolution resolves only the first import
#[tokio::test]
async fn test_contextual_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@scope%2fpkg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "scoped",
            "readme": "x".repeat(2001)
        })))
        .mount(&server)
        .await;

    let (_dir, manifest) = project_manifest(
        r#"{"dependencies": {"@scope/pkg": "2.1.0"}, "devDependencies": {"left-pad": "1.3.0"}}"#,
    )
    .await;
    let resolver = DocsResolver::new(manifest, registry_for(&server));

    let source = "import a from './a';\nimport p from '@scope/pkg/sub';\nimport l from 'left-pad';\n";
    let doc = resolver.resolve_contextual(source, "typescript").await;
    assert_eq!(doc.symbol, "@scope/pkg");
    assert_eq!(doc.title, "@scope/pkg (2.1.0)");

    // Homepage falls back to the listing page
    let urls: Vec<&str> = doc.links().iter().map(|l| l.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://www.npmjs.com/package/@scope/pkg",
            "https://www.npmjs.com/package/@scope/pkg",
        ]
    );

    let readme = doc.content.split("\n\n").nth(1).unwrap();
    assert_eq!(readme, format!("{}...", "x".repeat(2000)));
}

/// Relative-only files produce the fixed "no imports" result
#[tokio::test]
async fn test_contextual_relative_only() {
    let server = MockServer::start().await;
    let resolver = DocsResolver::new(None, registry_for(&server));

    let source = "import a from \"./a\";\nconst b = require('../b');\n";
    assert!(extract_imports(source).is_empty());

    let doc = resolver.resolve_contextual(source, "javascript").await;
    assert_eq!(doc.kind, DocKind::Unknown);
    assert_eq!(doc.symbol, "context");
    assert_eq!(doc.title, "No imports detected");
}

/// Exactly-at-budget readmes are left alone
#[tokio::test]
async fn test_readme_exactly_at_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "d",
            "readme": "y".repeat(2000)
        })))
        .mount(&server)
        .await;

    let manifest: DependencyManifest = [("exact".to_string(), "1.0.0".to_string())]
        .into_iter()
        .collect();
    let resolver = DocsResolver::new(Some(manifest), registry_for(&server));

    let doc = resolver.resolve("exact", "javascript").await;
    let readme = doc.content.split("\n\n").nth(1).unwrap();
    assert_eq!(readme.chars().count(), 2000);
    assert!(!readme.ends_with("..."));
}

/// Rendered panel update for a registry result
#[tokio::test]
async fn test_panel_update_rendering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/left-pad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "description": "String **left** pad",
            "readme": "Use `leftPad(str, len)`\nDone",
            "homepage": "https://github.com/left-pad/left-pad"
        })))
        .mount(&server)
        .await;

    let manifest: DependencyManifest = [("left-pad".to_string(), "^1.0.0".to_string())]
        .into_iter()
        .collect();
    let resolver = DocsResolver::new(Some(manifest), registry_for(&server));
    let doc = resolver.resolve("left-pad", "javascript").await;

    let html = render_doc_html(&doc);
    assert!(html.contains("<strong>Description:</strong> String <strong>left</strong> pad"));
    assert!(html.contains("<code>leftPad(str, len)</code><br>Done"));
    assert!(html.contains("data-url=\"https://github.com/left-pad/left-pad\""));

    let update = UpdateDocParams::new(doc, false);
    assert!(!update.silent);
    assert_eq!(update.html, html);
}
