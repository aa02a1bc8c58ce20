//! EIP-712 typed structured-data hashing.
//!
//! Built on top of [`crate::keccak::keccak256`]. The type-dependency resolver
//! walks `types` by DFS, stripping array suffixes for dependency analysis
//! only — array *encoding* itself stays out of scope here, and the inner
//! field encoder below simply rejects array-typed fields rather than
//! silently mis-encoding them.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::bigint::{self, U256};
use crate::error::{Error, Result};
use crate::keccak::keccak256;

/// One `{name, type}` entry of a struct's field list, in `types[S]`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// The full EIP-712 typed-data payload: `{types, primaryType, domain, message}`.
/// Derives `Deserialize` so callers can load it straight from the JSON shape
/// wallets pass to `eth_signTypedData`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypedData {
    pub types: IndexMap<String, Vec<TypeField>>,
    #[serde(rename = "primaryType")]
    pub primary_type: String,
    pub domain: Map<String, Value>,
    pub message: Map<String, Value>,
}

const DOMAIN_FIELD_ORDER: [(&str, &str); 5] = [
    ("name", "string"),
    ("version", "string"),
    ("chainId", "uint256"),
    ("verifyingContract", "address"),
    ("salt", "bytes32"),
];

/// Strips a trailing `[]` or `[K]` array suffix for dependency analysis.
/// `deps()` needs only the base type name; the inner encoder rejects arrays
/// outright.
fn strip_array_suffix(type_name: &str) -> &str {
    match type_name.find('[') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    }
}

fn is_array_type(type_name: &str) -> bool {
    type_name.contains('[')
}

/// DFS over `S`'s fields, recording every struct name reachable (including
/// `S` itself). A `visited` set doubles as cycle guard: a type that reaches
/// itself through a cycle is recorded once and not re-expanded, so
/// `encodeType` simply excludes `S` from its own dependency list rather than
/// looping forever.
fn collect_deps(name: &str, types: &IndexMap<String, Vec<TypeField>>, visited: &mut HashSet<String>) {
    if !visited.insert(name.to_string()) {
        return;
    }
    if let Some(fields) = types.get(name) {
        for field in fields {
            let base = strip_array_suffix(&field.type_name);
            if types.contains_key(base) {
                collect_deps(base, types, visited);
            }
        }
    }
}

fn struct_signature(name: &str, types: &IndexMap<String, Vec<TypeField>>) -> Result<String> {
    let fields = types
        .get(name)
        .ok_or_else(|| Error::Unsupported(format!("EIP-712 type not in `types`: {name}")))?;
    let body = fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("{name}({body})"))
}

/// `encodeType(S)`: `S`'s own signature followed by the signatures of every
/// struct it transitively depends on, sorted alphabetically. That ordering
/// applies to the *outer* `encodeType` call; nested calls for a dependency's
/// own `typeHash` use the same rule recursively, with that dependency
/// standing in as `S`.
fn encode_type(name: &str, types: &IndexMap<String, Vec<TypeField>>) -> Result<String> {
    let mut deps = HashSet::new();
    collect_deps(name, types, &mut deps);
    deps.remove(name);
    let mut others: Vec<&String> = deps.iter().collect();
    others.sort();

    let mut out = struct_signature(name, types)?;
    for other in others {
        out.push_str(&struct_signature(other, types)?);
    }
    Ok(out)
}

/// `typeHash(S) = keccak256(encodeType(S))`.
pub fn type_hash(name: &str, types: &IndexMap<String, Vec<TypeField>>) -> Result<[u8; 32]> {
    Ok(keccak256(encode_type(name, types)?.as_bytes()))
}

fn decode_hex_bytes(value: &Value) -> Result<Vec<u8>> {
    let Value::String(s) = value else {
        return Err(Error::InputShape("expected a 0x-prefixed hex string"));
    };
    let hex = s
        .strip_prefix("0x")
        .ok_or(Error::InputShape("expected a 0x-prefixed hex string"))?;
    if hex.len() % 2 != 0 {
        return Err(Error::InputShape("hex string must have an even number of digits"));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InputShape("invalid hex digit")))
        .collect()
}

fn parse_uint(value: &Value) -> Result<U256> {
    match value {
        Value::Number(n) => {
            let v = n
                .as_u64()
                .ok_or(Error::InputShape("uint value must be a non-negative integer or 0x-hex string"))?;
            Ok(U256::from_u64(v))
        }
        Value::String(_) => {
            let bytes = decode_hex_bytes(value)?;
            if bytes.len() > 32 {
                return Err(Error::InputRange("uint value exceeds 256 bits"));
            }
            let mut padded = [0u8; 32];
            padded[32 - bytes.len()..].copy_from_slice(&bytes);
            Ok(U256::from_be_bytes(&padded))
        }
        _ => Err(Error::InputShape("uint field requires a number or 0x-hex string")),
    }
}

fn numeric_width(type_name: &str, prefix: &str) -> Result<u32> {
    let digits = &type_name[prefix.len()..];
    let n: u32 = digits
        .parse()
        .map_err(|_| Error::Unsupported(format!("unrecognized EIP-712 type: {type_name}")))?;
    if n == 0 || n > 256 || n % 8 != 0 {
        return Err(Error::Unsupported(format!(
            "{prefix}N width must be a multiple of 8 in 8..=256, got {n}"
        )));
    }
    Ok(n)
}

fn encode_uint(type_name: &str, value: Option<&Value>) -> Result<[u8; 32]> {
    let n = numeric_width(type_name, "uint")?;
    let v = parse_uint(value.ok_or(Error::InputShape("uint field missing"))?)?;
    if v.bit_length().map(|b| b + 1).unwrap_or(0) > n {
        return Err(Error::InputRange("uint value exceeds its declared width"));
    }
    Ok(v.to_be_bytes())
}

/// Parses a JSON value into `(is_negative, magnitude)` for `intN` encoding.
/// Accepts a signed JSON number, or a `"-0x..."`/`"0x..."` hex magnitude.
fn parse_signed(value: &Value) -> Result<(bool, U256)> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok((v < 0, U256::from_u64(v.unsigned_abs())))
            } else if let Some(v) = n.as_u64() {
                Ok((false, U256::from_u64(v)))
            } else {
                Err(Error::InputShape("int value must fit in i64/u64 or be a hex string"))
            }
        }
        Value::String(s) => {
            let (negative, hex_value) = match s.strip_prefix('-') {
                Some(rest) => (true, Value::String(rest.to_string())),
                None => (false, value.clone()),
            };
            let bytes = decode_hex_bytes(&hex_value)?;
            if bytes.len() > 32 {
                return Err(Error::InputRange("int magnitude exceeds 256 bits"));
            }
            let mut padded = [0u8; 32];
            padded[32 - bytes.len()..].copy_from_slice(&bytes);
            Ok((negative, U256::from_be_bytes(&padded)))
        }
        _ => Err(Error::InputShape("int field requires a number or 0x-hex string")),
    }
}

fn encode_int(type_name: &str, value: Option<&Value>) -> Result<[u8; 32]> {
    let n = numeric_width(type_name, "int")?;
    let (negative, magnitude) = parse_signed(value.ok_or(Error::InputShape("int field missing"))?)?;
    let limit = bigint::pow2(n - 1);
    if negative {
        if magnitude > limit {
            return Err(Error::InputRange("intN magnitude too large (negative range)"));
        }
        Ok(bigint::wrapping_neg(&magnitude).to_be_bytes())
    } else {
        if magnitude >= limit {
            return Err(Error::InputRange("intN magnitude too large (positive range)"));
        }
        Ok(magnitude.to_be_bytes())
    }
}

fn encode_fixed_bytes(type_name: &str, value: Option<&Value>) -> Result<[u8; 32]> {
    let n: usize = type_name["bytes".len()..]
        .parse()
        .map_err(|_| Error::Unsupported(format!("unrecognized EIP-712 type: {type_name}")))?;
    if n == 0 || n > 32 {
        return Err(Error::Unsupported(format!("bytesN width must be in 1..=32, got {n}")));
    }
    let bytes = decode_hex_bytes(value.ok_or(Error::InputShape("bytesN field missing"))?)?;
    if bytes.len() != n {
        return Err(Error::InputShape("bytesN value has the wrong length"));
    }
    let mut out = [0u8; 32];
    out[..n].copy_from_slice(&bytes);
    Ok(out)
}

fn encode_address(value: Option<&Value>) -> Result<[u8; 32]> {
    let bytes = decode_hex_bytes(value.ok_or(Error::InputShape("address field missing"))?)?;
    if bytes.len() != 20 {
        return Err(Error::InputShape("address must decode to 20 bytes"));
    }
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(&bytes);
    Ok(out)
}

fn encode_primitive(type_name: &str, value: Option<&Value>) -> Result<[u8; 32]> {
    if is_array_type(type_name) {
        return Err(Error::Unsupported(
            "array-typed EIP-712 fields are not encoded by this core".to_string(),
        ));
    }
    match type_name {
        "string" => match value {
            None | Some(Value::Null) => Ok([0u8; 32]),
            Some(Value::String(s)) => Ok(keccak256(s.as_bytes())),
            _ => Err(Error::InputShape("string field requires a JSON string")),
        },
        "bytes" => match value {
            None | Some(Value::Null) => Ok([0u8; 32]),
            Some(v) => Ok(keccak256(&decode_hex_bytes(v)?)),
        },
        "bool" => {
            let b = match value {
                None | Some(Value::Null) => return Ok([0u8; 32]),
                Some(Value::Bool(b)) => *b,
                _ => return Err(Error::InputShape("bool field requires a JSON boolean")),
            };
            let mut out = [0u8; 32];
            out[31] = b as u8;
            Ok(out)
        }
        "address" => match value {
            None | Some(Value::Null) => Ok([0u8; 32]),
            Some(_) => encode_address(value),
        },
        t if t.starts_with("uint") => encode_uint(t, value),
        t if t.starts_with("int") => encode_int(t, value),
        t if t.starts_with("bytes") => match value {
            None | Some(Value::Null) => Ok([0u8; 32]),
            Some(_) => encode_fixed_bytes(t, value),
        },
        other => Err(Error::Unsupported(format!(
            "unsupported EIP-712 primitive type: {other}"
        ))),
    }
}

fn encode_field(
    field_type: &str,
    value: Option<&Value>,
    types: &IndexMap<String, Vec<TypeField>>,
) -> Result<[u8; 32]> {
    let base = strip_array_suffix(field_type);
    if types.contains_key(base) {
        if is_array_type(field_type) {
            return Err(Error::Unsupported(
                "array-of-struct EIP-712 fields are not encoded by this core".to_string(),
            ));
        }
        return match value {
            None | Some(Value::Null) => Ok([0u8; 32]),
            Some(Value::Object(obj)) => hash_struct(base, obj, types),
            _ => Err(Error::InputShape("struct-typed field value must be a JSON object")),
        };
    }
    encode_primitive(field_type, value)
}

/// `hashStruct(S, data, types)`: `typeHash(S)` followed by each field encoded
/// to 32 bytes (field order from `types[S]`, never from `data`'s own key
/// order), Keccak-256 of the concatenation.
pub fn hash_struct(
    name: &str,
    data: &Map<String, Value>,
    types: &IndexMap<String, Vec<TypeField>>,
) -> Result<[u8; 32]> {
    let fields = types
        .get(name)
        .ok_or_else(|| Error::Unsupported(format!("EIP-712 type not in `types`: {name}")))?;
    let mut buf = Vec::with_capacity(32 + fields.len() * 32);
    buf.extend_from_slice(&type_hash(name, types)?);
    for field in fields {
        buf.extend_from_slice(&encode_field(&field.type_name, data.get(&field.name), types)?);
    }
    Ok(keccak256(&buf))
}

/// The synthesized `EIP712Domain` struct: only the caller-supplied subset of
/// `{name, version, chainId, verifyingContract, salt}`, in that fixed
/// canonical order regardless of the input dict's own key order. Rejects any
/// other key.
fn domain_separator(domain: &Map<String, Value>) -> Result<[u8; 32]> {
    for key in domain.keys() {
        if !DOMAIN_FIELD_ORDER.iter().any(|(k, _)| k == key) {
            return Err(Error::Unsupported(format!("unknown EIP-712 domain key: {key}")));
        }
    }
    let fields: Vec<TypeField> = DOMAIN_FIELD_ORDER
        .iter()
        .filter(|(k, _)| domain.contains_key(*k))
        .map(|(k, t)| TypeField {
            name: (*k).to_string(),
            type_name: (*t).to_string(),
        })
        .collect();
    let mut types = IndexMap::new();
    types.insert("EIP712Domain".to_string(), fields);
    hash_struct("EIP712Domain", domain, &types)
}

/// `keccak256(0x19 || 0x01 || domainSeparator || hashStruct(primaryType, message, types))`,
/// the full EIP-712 message hash.
#[tracing::instrument(level = "debug", skip(typed), fields(primary_type = %typed.primary_type))]
pub fn eip712_hash_full_message(typed: &TypedData) -> Result<[u8; 32]> {
    let domain_sep = domain_separator(&typed.domain)?;
    let struct_hash = hash_struct(&typed.primary_type, &typed.message, &typed.types)?;

    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(&[0x19, 0x01]);
    buf.extend_from_slice(&domain_sep);
    buf.extend_from_slice(&struct_hash);
    Ok(keccak256(&buf))
}

/// The four fields the legacy "Agent" domain variant needs — no `salt`, and
/// `chainId`/`verifyingContract` are always present.
#[derive(Debug, Clone, Copy)]
pub struct AgentDomain<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub chain_id: u64,
    pub verifying_contract: [u8; 20],
}

/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`,
/// keccak256'd once per call rather than cached — this path is the rarely-used
/// legacy variant, not the hot path.
fn agent_domain_type_hash() -> [u8; 32] {
    keccak256(b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
}

fn agent_type_hash() -> [u8; 32] {
    keccak256(b"Agent(string source,bytes32 connectionId)")
}

/// The legacy "Agent" EIP-712 domain variant: a hand-assembled `EIP712Domain`
/// struct hash (no generic type registry involved) plus an
/// `Agent(string source, bytes32 connectionId)` struct, under the usual
/// `0x1901` prefix.
pub fn eip712_hash_agent_message(domain: &AgentDomain, source: &str, connection_id: &[u8; 32]) -> [u8; 32] {
    let mut domain_buf = Vec::with_capacity(32 * 4);
    domain_buf.extend_from_slice(&agent_domain_type_hash());
    domain_buf.extend_from_slice(&keccak256(domain.name.as_bytes()));
    domain_buf.extend_from_slice(&keccak256(domain.version.as_bytes()));
    let mut chain_id_bytes = [0u8; 32];
    chain_id_bytes[24..].copy_from_slice(&domain.chain_id.to_be_bytes());
    domain_buf.extend_from_slice(&chain_id_bytes);
    let mut contract_bytes = [0u8; 32];
    contract_bytes[12..].copy_from_slice(&domain.verifying_contract);
    domain_buf.extend_from_slice(&contract_bytes);
    let domain_separator = keccak256(&domain_buf);

    let mut struct_buf = Vec::with_capacity(32 * 3);
    struct_buf.extend_from_slice(&agent_type_hash());
    struct_buf.extend_from_slice(&keccak256(source.as_bytes()));
    struct_buf.extend_from_slice(connection_id);
    let struct_hash = keccak256(&struct_buf);

    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(&[0x19, 0x01]);
    buf.extend_from_slice(&domain_separator);
    buf.extend_from_slice(&struct_hash);
    keccak256(&buf)
}
