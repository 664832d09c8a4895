//! The document an empty editor starts from.

/// A small OpenAPI description exercising paths, responses with numeric
/// status keys, and `$ref` links into `components`.
pub const PETSTORE_YAML: &str = r##"openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
servers:
- url: https://petstore.example.com/v1
paths:
  /pets:
    get:
      summary: List all pets
      operationId: listPets
      tags:
      - pets
      responses:
        200:
          description: A list of pets
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pets'
        default:
          description: Unexpected error
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Error'
    post:
      summary: Create a pet
      operationId: createPet
      tags:
      - pets
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        201:
          description: Created
components:
  schemas:
    Pet:
      type: object
      required:
      - id
      - name
      properties:
        id:
          type: integer
          format: int64
        name:
          type: string
        tag:
          type: string
    Pets:
      type: array
      items:
        $ref: '#/components/schemas/Pet'
    Error:
      type: object
      required:
      - code
      - message
      properties:
        code:
          type: integer
          format: int32
        message:
          type: string
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{parse, Format};
    use docsync_pointer::{resolve, resolve_chain, Resolution};

    #[test]
    fn sample_parses_as_yaml_with_string_status_keys() {
        let (doc, format) = parse(PETSTORE_YAML).unwrap();
        assert_eq!(format, Format::Yaml);
        assert!(doc["paths"]["/pets"]["get"]["responses"].get("200").is_some());
    }

    #[test]
    fn sample_references_resolve() {
        let (doc, _) = parse(PETSTORE_YAML).unwrap();
        assert!(resolve(&doc, "#/components/schemas/Pet").is_some());
        assert!(matches!(
            resolve_chain(&doc, "#/components/schemas/Pets/items"),
            Resolution::Found { .. }
        ));
    }
}
