//! Full-pipeline benchmarks: resolution only, and resolution plus schema checks.
//!
//! Run with: cargo bench -p specward-validator

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use specward_spec::parse_spec;
use specward_validator::{resolve, validate, validate_with, JsonSchemaValidator, ObservedResponse};

const SPEC: &str = r##"
openapi: "3.0.3"
info: {title: bench, version: "1"}
servers:
  - url: https://api.example.com/v1
  - url: https://api.example.com/v2
paths:
  /users:
    get:
      responses:
        "200":
          description: list
          content:
            application/json:
              schema:
                type: array
                items: {$ref: "#/components/schemas/User"}
  /users/{id}:
    get:
      responses:
        "200":
          description: one
          headers:
            X-Rate-Limit:
              schema: {type: integer}
          content:
            application/json:
              schema: {$ref: "#/components/schemas/User"}
  /users/{id}/orders/{orderId}:
    get:
      responses:
        "200": {description: order}
components:
  schemas:
    User:
      type: object
      required: [id, name]
      properties:
        id: {type: integer}
        name: {type: string}
        email: {type: string, format: email}
"##;

fn bench_pipeline(c: &mut Criterion) {
    let spec = match parse_spec(SPEC) {
        Ok(spec) => spec,
        Err(e) => panic!("bench spec failed to load: {}", e),
    };
    let validator = JsonSchemaValidator::for_spec(&spec);

    let one = ObservedResponse::new("GET", "/v2/users/42", 200)
        .with_body(json!({"id": 42, "name": "ada", "email": "ada@example.com"}))
        .with_header("X-Rate-Limit", "100");
    let many = ObservedResponse::new("GET", "/v1/users", 200).with_body(json!((0..100)
        .map(|i| json!({"id": i, "name": format!("user{}", i)}))
        .collect::<Vec<_>>()));
    let unknown = ObservedResponse::new("GET", "/v3/users", 200);

    let mut group = c.benchmark_group("pipeline");

    group.bench_function("resolve_nested", |b| {
        let response = ObservedResponse::new("GET", "/v1/users/1/orders/2", 200);
        b.iter(|| black_box(resolve(&spec, &response).is_ok()))
    });

    group.bench_function("validate_single_object", |b| {
        b.iter(|| black_box(validate_with(&spec, &one, &validator).is_ok()))
    });

    group.bench_function("validate_array_100", |b| {
        b.iter(|| black_box(validate_with(&spec, &many, &validator).is_ok()))
    });

    group.bench_function("validate_default_validator", |b| {
        b.iter(|| black_box(validate(&spec, &one).is_ok()))
    });

    group.bench_function("server_not_found", |b| {
        b.iter(|| black_box(validate_with(&spec, &unknown, &validator).is_err()))
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
