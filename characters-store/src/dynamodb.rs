//! DynamoDB document table
//!
//! Items are stored as native DynamoDB maps so the table stays readable from
//! the AWS console and other tools. The table's partition key is the string
//! attribute `id`.

use crate::error::{StorageError, StorageResult};
use crate::table::DocumentTable;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    config::Credentials, error::DisplayErrorContext, primitives::Blob, types::AttributeValue,
    Client,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use characters_core::{Character, StorageConfig, ID_FIELD};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tracing::{debug, info};

type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: Client,
    table: String,
}

impl DynamoTable {
    /// Build a client from the storage configuration.
    ///
    /// Region and static credentials fall back to the SDK's default
    /// provider chain when they are not configured.
    pub async fn connect(config: &StorageConfig) -> StorageResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        match (&config.access_key_id, &config.secret_access_key) {
            (Some(key_id), Some(secret)) => {
                loader = loader.credentials_provider(Credentials::new(
                    key_id,
                    secret,
                    None,
                    None,
                    "characters-config",
                ));
            }
            (None, None) => {}
            _ => {
                return Err(StorageError::Config(
                    "AWS access key id and secret access key must be set together".to_string(),
                ))
            }
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        info!(
            "Using DynamoDB table '{}' in region {:?}",
            config.table_name,
            sdk_config.region().map(|r| r.as_ref().to_string())
        );

        Ok(Self::new(Client::new(&sdk_config), &config.table_name))
    }

    pub fn new(client: Client, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    fn error<E>(&self, operation: &'static str, e: E) -> StorageError
    where
        E: std::error::Error,
    {
        StorageError::backend(operation, &self.table, DisplayErrorContext(e).to_string())
    }

    fn key(id: &str) -> (String, AttributeValue) {
        (ID_FIELD.to_string(), AttributeValue::S(id.to_string()))
    }
}

#[async_trait]
impl DocumentTable for DynamoTable {
    fn name(&self) -> &'static str {
        "dynamodb"
    }

    async fn scan(&self) -> StorageResult<Vec<Character>> {
        let mut characters = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| self.error("scan", e))?;
            pages += 1;

            for item in output.items() {
                characters.push(item_to_character(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!("Scan of '{}' read {} page(s)", self.table, pages);
        Ok(characters)
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Character>> {
        let (name, value) = Self::key(id);
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(name, value)
            .send()
            .await
            .map_err(|e| self.error("get", e))?;

        output.item().map(item_to_character).transpose()
    }

    async fn put(&self, item: Character) -> StorageResult<()> {
        if item.id().is_none() {
            return Err(StorageError::malformed("item has no string id"));
        }

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(character_to_item(item)))
            .send()
            .await
            .map_err(|e| self.error("put", e))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let (name, value) = Self::key(id);
        self.client
            .delete_item()
            .table_name(&self.table)
            .key(name, value)
            .send()
            .await
            .map_err(|e| self.error("delete", e))?;
        Ok(())
    }
}

fn character_to_item(character: Character) -> Item {
    character
        .into_fields()
        .into_iter()
        .map(|(key, value)| (key, json_to_attribute(value)))
        .collect()
}

fn item_to_character(item: &Item) -> StorageResult<Character> {
    let fields = item
        .iter()
        .map(|(key, value)| -> StorageResult<(String, Value)> {
            Ok((key.clone(), attribute_to_json(value)?))
        })
        .collect::<StorageResult<Map<String, Value>>>()?;
    Ok(Character::new(fields))
}

fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(json_to_attribute).collect())
        }
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(key, value)| (key, json_to_attribute(value)))
                .collect(),
        ),
    }
}

fn attribute_to_json(value: &AttributeValue) -> StorageResult<Value> {
    let json = match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::B(blob) => Value::String(encode_blob(blob)),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<StorageResult<Vec<Value>>>()?,
        ),
        AttributeValue::Bs(blobs) => {
            Value::Array(blobs.iter().map(|b| Value::String(encode_blob(b))).collect())
        }
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<StorageResult<Vec<Value>>>()?,
        ),
        AttributeValue::M(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, value)| -> StorageResult<(String, Value)> {
                    Ok((key.clone(), attribute_to_json(value)?))
                })
                .collect::<StorageResult<Map<String, Value>>>()?,
        ),
        other => {
            return Err(StorageError::malformed(format!(
                "unsupported attribute type: {:?}",
                other
            )))
        }
    };
    Ok(json)
}

fn parse_number(raw: &str) -> StorageResult<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StorageError::malformed(format!("invalid number: {}", raw)))
}

fn encode_blob(blob: &Blob) -> String {
    STANDARD.encode(blob.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::operation::{
        delete_item::DeleteItemOutput, get_item::GetItemOutput, put_item::PutItemOutput,
        scan::ScanOutput,
    };
    use aws_smithy_mocks::{mock, mock_client};
    use serde_json::json;

    #[test]
    fn test_character_item_round_trip() {
        let value = json!({
            "id": "c1",
            "name": "Madame Maxime",
            "alternate_names": ["Olympe Maxime"],
            "wand": {"length": "", "core": "", "wood": ""},
            "alive": true,
            "yearOfBirth": 1920,
            "height": 3.5,
            "patronus": null
        });
        let character = Character::try_from(value.clone()).unwrap();

        let item = character_to_item(character.clone());
        assert!(matches!(item.get("id"), Some(AttributeValue::S(s)) if s == "c1"));
        assert!(matches!(item.get("wand"), Some(AttributeValue::M(_))));
        assert!(matches!(item.get("alternate_names"), Some(AttributeValue::L(_))));
        assert!(matches!(item.get("patronus"), Some(AttributeValue::Null(true))));

        assert_eq!(item_to_character(&item).unwrap(), character);
    }

    #[test]
    fn test_sets_decode_to_arrays() {
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::S("x".to_string()));
        item.insert(
            "tags".to_string(),
            AttributeValue::Ss(vec!["wizard".to_string(), "auror".to_string()]),
        );
        item.insert(
            "scores".to_string(),
            AttributeValue::Ns(vec!["1".to_string(), "2.5".to_string()]),
        );
        item.insert(
            "portrait".to_string(),
            AttributeValue::B(Blob::new(b"hi".to_vec())),
        );

        let character = item_to_character(&item).unwrap();
        assert_eq!(character.get("tags"), Some(&json!(["wizard", "auror"])));
        assert_eq!(character.get("scores"), Some(&json!([1, 2.5])));
        assert_eq!(character.get("portrait"), Some(&json!("aGk=")));
    }

    #[test]
    fn test_large_unsigned_number() {
        assert_eq!(
            parse_number("18446744073709551615").unwrap(),
            Number::from(u64::MAX)
        );
        assert!(parse_number("not-a-number").is_err());
    }

    fn id_item(id: &str, name: &str) -> Item {
        HashMap::from([
            ("id".to_string(), AttributeValue::S(id.to_string())),
            ("name".to_string(), AttributeValue::S(name.to_string())),
        ])
    }

    fn is_key(key: Option<&Item>, id: &str) -> bool {
        key.and_then(|key| key.get(ID_FIELD)) == Some(&AttributeValue::S(id.to_string()))
    }

    #[tokio::test]
    async fn test_scan_follows_last_evaluated_key() {
        let first_page = mock!(Client::scan)
            .match_requests(|req| {
                req.table_name() == Some("characters") && req.exclusive_start_key().is_none()
            })
            .then_output(|| {
                ScanOutput::builder()
                    .items(id_item("a", "Harry Potter"))
                    .items(id_item("b", "Ron Weasley"))
                    .last_evaluated_key(ID_FIELD, AttributeValue::S("b".to_string()))
                    .build()
            });
        let second_page = mock!(Client::scan)
            .match_requests(|req| is_key(req.exclusive_start_key(), "b"))
            .then_output(|| {
                ScanOutput::builder()
                    .items(id_item("c", "Hermione Granger"))
                    .build()
            });

        let client = mock_client!(aws_sdk_dynamodb, [&first_page, &second_page]);
        let table = DynamoTable::new(client, "characters");

        let ids: Vec<String> = table
            .scan()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id().unwrap().to_string())
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(first_page.num_calls(), 1);
        assert_eq!(second_page.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_item_is_none() {
        let lookup = mock!(Client::get_item)
            .match_requests(|req| req.table_name() == Some("characters") && is_key(req.key(), "missing"))
            .then_output(|| GetItemOutput::builder().build());

        let client = mock_client!(aws_sdk_dynamodb, [&lookup]);
        let table = DynamoTable::new(client, "characters");

        assert!(table.get("missing").await.unwrap().is_none());
        assert_eq!(lookup.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_present_item() {
        let lookup = mock!(Client::get_item)
            .match_requests(|req| is_key(req.key(), "a"))
            .then_output(|| {
                GetItemOutput::builder()
                    .set_item(Some(id_item("a", "Harry Potter")))
                    .build()
            });

        let client = mock_client!(aws_sdk_dynamodb, [&lookup]);
        let table = DynamoTable::new(client, "characters");

        let character = table.get("a").await.unwrap().unwrap();
        assert_eq!(
            serde_json::Value::from(character),
            json!({"id": "a", "name": "Harry Potter"})
        );
    }

    #[tokio::test]
    async fn test_put_and_delete_address_the_id_key() {
        let put = mock!(Client::put_item)
            .match_requests(|req| {
                req.table_name() == Some("characters")
                    && is_key(req.item(), "a")
                    && req.item().and_then(|item| item.get("house"))
                        == Some(&AttributeValue::S("Gryffindor".to_string()))
            })
            .then_output(|| PutItemOutput::builder().build());
        let delete = mock!(Client::delete_item)
            .match_requests(|req| is_key(req.key(), "a"))
            .then_output(|| DeleteItemOutput::builder().build());

        let client = mock_client!(aws_sdk_dynamodb, [&put, &delete]);
        let table = DynamoTable::new(client, "characters");

        let character =
            Character::try_from(json!({"id": "a", "house": "Gryffindor"})).unwrap();
        table.put(character).await.unwrap();
        table.delete("a").await.unwrap();

        assert_eq!(put.num_calls(), 1);
        assert_eq!(delete.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_put_without_id_never_calls_dynamodb() {
        let put = mock!(Client::put_item).then_output(|| PutItemOutput::builder().build());

        let client = mock_client!(aws_sdk_dynamodb, [&put]);
        let table = DynamoTable::new(client, "characters");

        let character = Character::try_from(json!({"name": "Nobody"})).unwrap();
        assert!(matches!(
            table.put(character).await,
            Err(StorageError::MalformedItem { .. })
        ));
        assert_eq!(put.num_calls(), 0);
    }
}
