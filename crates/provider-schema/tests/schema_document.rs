use indoc::indoc;
use provider_schema::{
    NestingMode, SchemaDocument, WireType, WireValue,
    visit::{NestingSignature, NestingSurvey, flat_resources},
};
use serde_json::json;

const DOCUMENT: &str = indoc! {r#"
    {
      "format_version": "1.0",
      "provider_schemas": {
        "registry.terraform.io/hashicorp/aws": {
          "resource_schemas": {
            "aws_security_group": {
              "version": 1,
              "block": {
                "attributes": {
                  "id": { "type": "string", "optional": true, "computed": true },
                  "name": { "type": "string", "optional": true },
                  "arn": { "type": "string", "computed": true },
                  "tags": { "type": ["map", "string"], "optional": true }
                },
                "block_types": {
                  "ingress": {
                    "nesting_mode": "set",
                    "block": {
                      "attributes": {
                        "from_port": { "type": "number", "required": true },
                        "cidr_blocks": { "type": ["list", "string"], "optional": true }
                      }
                    }
                  },
                  "timeouts": {
                    "nesting_mode": "single",
                    "block": {
                      "attributes": {
                        "create": { "type": "string", "optional": true }
                      }
                    }
                  }
                }
              }
            },
            "aws_iam_user": {
              "block": {
                "attributes": {
                  "name": { "type": "string", "required": true }
                }
              }
            }
          }
        }
      }
    }
"#};

fn document() -> SchemaDocument {
    serde_json::from_str(DOCUMENT).expect("valid schema document")
}

#[test]
fn parse_document() {
    let document = document();
    let provider = &document.provider_schemas["registry.terraform.io/hashicorp/aws"];
    let group = &provider.resource_schemas["aws_security_group"];

    assert_eq!(document.format_version, "1.0");
    assert_eq!(group.version, 1);
    assert_eq!(
        group.block.attributes["tags"].wire_type,
        WireType::map(WireType::String)
    );
    assert!(!group.block.attributes["arn"].is_argument());
    assert_eq!(group.block.block_types["ingress"].nesting, NestingMode::Set);
}

#[test]
fn survey_and_flat_resources() {
    let document = document();
    let provider = &document.provider_schemas["registry.terraform.io/hashicorp/aws"];
    let survey = NestingSurvey::of(provider);

    let set = NestingSignature {
        mode: NestingMode::Set,
        min_items: 0,
        max_items: 0,
        required: false,
    };

    assert_eq!(survey.len(), 2);
    assert_eq!(survey.paths(&set), ["aws_security_group.ingress"]);
    assert_eq!(flat_resources(provider), ["aws_iam_user"]);
}

#[test]
fn state_against_implied_type() {
    let document = document();
    let schema = &document.provider_schemas["registry.terraform.io/hashicorp/aws"].resource_schemas
        ["aws_security_group"];

    let state = json!({
        "id": "sg-123",
        "name": "web",
        "arn": "arn:aws:ec2:sg-123",
        "tags": { "team": "infra" },
        "ingress": [{ "from_port": 443, "cidr_blocks": ["10.0.0.0/8"] }],
        "timeouts": null
    });

    let value = WireValue::from_json(&state, &schema.block.implied_type())
        .expect("state matches the schema");

    assert_eq!(value.get("id").and_then(WireValue::as_str), Some("sg-123"));
    assert!(matches!(value.get("ingress"), Some(WireValue::Set(rules)) if rules.len() == 1));
    assert_eq!(value.to_json(), state);
}
