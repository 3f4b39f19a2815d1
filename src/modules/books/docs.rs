//! OpenAPI fragment for the books module.

use serde_json::{json, Value};

use super::models::Genre;

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{}", schema) }
            }
        }
    })
}

fn query_param(name: &str, description: &str, schema: Value) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": schema
    })
}

fn id_param() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn book_body(required: bool) -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": if required {
                        "#/components/schemas/CreateBook"
                    } else {
                        "#/components/schemas/UpdateBook"
                    }
                }
            }
        }
    })
}

fn book_fields() -> Value {
    json!({
        "title": { "type": "string", "minLength": 3, "description": "Book Title" },
        "author": { "type": "string", "minLength": 3, "description": "Book Author" },
        "publishedYear": {
            "type": "integer",
            "minimum": 1900,
            "maximum": 2200,
            "description": "Published Year"
        },
        "stock": { "type": "integer", "minimum": 0, "description": "Number of stock" },
        "genres": {
            "type": "array",
            "items": { "$ref": "#/components/schemas/Genre" },
            "description": "List of genres"
        }
    })
}

pub fn openapi() -> Value {
    let mut book_properties = book_fields();
    book_properties["id"] = json!({ "type": "integer", "format": "int64" });
    book_properties["createdAt"] = json!({ "type": "string", "format": "date-time" });
    book_properties["updatedAt"] = json!({ "type": "string", "format": "date-time" });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        query_param("search", "Search keyword", json!({ "type": "string" })),
                        query_param("page", "Page number", json!({ "type": "integer", "minimum": 1, "default": 1 })),
                        query_param("limit", "Number of items per page. 0 to get all data", json!({ "type": "integer", "minimum": 0, "default": 10 })),
                        query_param("sortBy", "Sort field", json!({ "type": "string", "default": "createdAt" })),
                        query_param("order", "Sort order (asc/desc)", json!({ "type": "string", "enum": ["asc", "desc"], "default": "desc" })),
                        query_param("genre", "Filter by genre", json!({ "$ref": "#/components/schemas/Genre" }))
                    ],
                    "responses": {
                        "200": json_response("Paginated list of books", "PaginatedBooks"),
                        "400": error_response("Invalid query")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": book_body(true),
                    "responses": {
                        "200": json_response("Created book", "Book"),
                        "400": error_response("Validation failed"),
                        "409": error_response("Book with this title already exists")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_param()],
                    "responses": {
                        "200": json_response("The book", "Book"),
                        "404": error_response("Book is not found")
                    }
                },
                "patch": {
                    "summary": "Update a book",
                    "tags": ["Books"],
                    "parameters": [id_param()],
                    "requestBody": book_body(false),
                    "responses": {
                        "200": json_response("Updated book", "Book"),
                        "400": error_response("Validation failed"),
                        "404": error_response("Book is not found"),
                        "409": error_response("Book with this title already exists")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param()],
                    "responses": {
                        "200": {
                            "description": "Book deleted successfully",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "message": { "type": "string" } }
                                    }
                                }
                            }
                        },
                        "404": error_response("Book is not found")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Genre": { "type": "string", "enum": Genre::NAMES },
                "Book": {
                    "type": "object",
                    "properties": book_properties,
                    "required": ["id", "title", "author", "publishedYear", "stock", "genres", "createdAt", "updatedAt"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": book_fields(),
                    "required": ["title", "author", "publishedYear", "stock", "genres"]
                },
                "UpdateBook": {
                    "type": "object",
                    "properties": book_fields()
                },
                "PaginatedBooks": {
                    "type": "object",
                    "properties": {
                        "data": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } },
                        "total": { "type": "integer" },
                        "limit": { "type": "integer" },
                        "page": { "type": "integer" },
                        "last_page": { "type": "integer" }
                    },
                    "required": ["data", "total", "limit", "page", "last_page"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_lists_every_operation() {
        let spec = openapi();
        let paths = &spec["paths"];
        assert!(paths["/"]["get"].is_object());
        assert!(paths["/"]["post"].is_object());
        for method in ["get", "patch", "delete"] {
            assert!(paths["/{id}"][method].is_object(), "missing {method}");
        }
        assert_eq!(
            spec["components"]["schemas"]["Genre"]["enum"]
                .as_array()
                .map(Vec::len),
            Some(Genre::ALL.len())
        );
    }
}
