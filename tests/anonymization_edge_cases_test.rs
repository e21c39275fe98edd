//! Edge case and property tests for the anonymizer

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::net::Ipv4Addr;
use task_anonymizer::anonymization::anonymizer::network::{
    is_reserved_ipv4, DEFAULT_IPV4_ALLOW_LIST, DEFAULT_IPV6_ALLOW_LIST,
};
use task_anonymizer::anonymization::detector::patterns::EMAIL;
use task_anonymizer::anonymization::{Anonymizer, AnonymizerConfig};
use task_anonymizer::domain::{AnonymizerError, Document, Mapping, Number, Scalar};
use task_anonymizer::{anonymize_batch, anonymize_scalar, is_email_address, redact_ip, redact_ipv4};

fn seeded(seed: u64) -> Anonymizer<StdRng> {
    Anonymizer::with_seed(&AnonymizerConfig::default(), seed).unwrap()
}

/// Documents exercising every container kind and every rule
fn corpus() -> Vec<Document> {
    let mut numeric_keys = Mapping::new();
    numeric_keys.insert(Scalar::Number(Number::PosInt(1)), "first@corp.example.org");
    numeric_keys.insert(Scalar::Null, Scalar::Number(Number::Float(2.5)));
    numeric_keys.insert(Scalar::Bool(false), vec![Document::from("81.2.69.142")]);

    vec![
        Document::from(json!({})),
        Document::from(json!([])),
        Document::from(json!("lone scalar")),
        Document::from(json!(null)),
        Document::from(json!({
            "name": "Rotate credentials for ops@corp.example.org and dev@corp.example.org",
            "hosts": ["81.2.69.142", "2a00:1450:4001::1", "10.0.0.5", "8.8.8.8"],
            "vars": {
                "db_password": "S3cr3t!Pass",
                "api_key": ["Xk9#vT2q", "", "{{ lookup('env', 'API_KEY') }}"],
                "private_key": "~/.ssh/id_ed25519",
                "token_expires": "2025-12-31",
                "retries": 3,
                "enabled": true,
                "ratio": -0.75,
                "offset": -12
            },
            "when": "{% if inventory_hostname in groups['db'] %}true{% endif %}"
        })),
        Document::from(json!([
            [["nested", ["deeper", {"password": ["Zz9$Zz8%Yy7&"]}]]],
            {"contraseña": "Ünïcödé-P4ss!", "clé": "élodie@exemple.fr"}
        ])),
        Document::from(numeric_keys),
    ]
}

/// Equal up to values produced by the email surrogate generator
fn equivalent(left: &Document, right: &Document) -> bool {
    match (left, right) {
        (Document::Mapping(l), Document::Mapping(r)) => {
            l.len() == r.len()
                && l.iter()
                    .zip(r.iter())
                    .all(|((lk, lv), (rk, rv))| lk == rk && equivalent(lv, rv))
        }
        (Document::Sequence(l), Document::Sequence(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(lv, rv)| equivalent(lv, rv))
        }
        (Document::Scalar(l), Document::Scalar(r)) => {
            l == r
                || matches!((l.as_str(), r.as_str()), (Some(a), Some(b)) if is_email_address(a) && is_email_address(b))
        }
        _ => false,
    }
}

fn email_count(document: &Document) -> usize {
    let mut count = 0;
    document.for_each_scalar(&mut |scalar| {
        if let Some(value) = scalar.as_str() {
            count += EMAIL.find_iter(value).count();
        }
    });
    count
}

#[test]
fn test_shape_is_preserved() {
    let mut anonymizer = seeded(1);
    for document in corpus() {
        assert_eq!(anonymizer.walk(&document).shape(), document.shape());
    }
}

#[test]
fn test_non_string_scalars_pass_through() {
    let mut anonymizer = seeded(2);
    for document in corpus() {
        let walked = anonymizer.walk(&document);

        let mut before = Vec::new();
        document.for_each_scalar(&mut |scalar| {
            if scalar.as_str().is_none() {
                before.push(scalar.clone());
            }
        });
        let mut after = Vec::new();
        walked.for_each_scalar(&mut |scalar| {
            if scalar.as_str().is_none() {
                after.push(scalar.clone());
            }
        });

        assert_eq!(before, after);
    }
}

#[test]
fn test_walk_is_idempotent_modulo_surrogates() {
    let mut anonymizer = seeded(3);
    for document in corpus() {
        let once = anonymizer.walk(&document);
        let twice = anonymizer.walk(&once);
        assert!(equivalent(&once, &twice), "{once:?}\n!=\n{twice:?}");
    }
}

#[test]
fn test_templating_is_a_fixpoint_for_every_key() {
    let values = [
        "{{ ansible_user }}",
        "{{}}",
        "{% for host in groups['web'] %}{{ host }}@corp.example.org{% endfor %}",
        "prefix {{ 10.0.0.1 }}",
    ];
    let keys = ["", "name", "password", "api_key", "key_name", "ip"];

    for value in values {
        for key in keys {
            assert_eq!(
                anonymize_scalar(&Scalar::from(value), key),
                Scalar::from(value),
                "{value} under {key}"
            );
        }
    }
}

#[test]
fn test_allow_listed_addresses_are_fixpoints() {
    for addr in DEFAULT_IPV4_ALLOW_LIST {
        assert_eq!(redact_ip(&addr.to_string()), addr.to_string());
    }
    for addr in DEFAULT_IPV6_ALLOW_LIST {
        assert_eq!(redact_ip(&addr.to_string()), addr.to_string());
    }
}

#[test]
fn test_public_ipv4_subnet_containment() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut checked = 0;

    while checked < 500 {
        let addr = Ipv4Addr::from(rng.gen::<u32>());
        if is_reserved_ipv4(addr) || DEFAULT_IPV4_ALLOW_LIST.contains(&addr) {
            continue;
        }

        let redacted = redact_ipv4(addr);
        assert_eq!(redacted.octets()[..3], addr.octets()[..3], "{addr}");
        checked += 1;
    }
}

#[test]
fn test_email_wins_over_password_placeholder() {
    let mut anonymizer = seeded(7);
    let walked = anonymizer.walk(&Document::from(json!({"password": "foo@montreal.ca"})));
    let value = walked.get("password").and_then(Document::as_str).unwrap();

    assert_ne!(value, "{{}}");
    assert_ne!(value, "foo@montreal.ca");
    assert!(is_email_address(value));
}

#[test]
fn test_email_count_never_grows() {
    let mut anonymizer = seeded(8);
    for document in corpus() {
        let walked = anonymizer.walk(&document);
        assert!(email_count(&walked) <= email_count(&document));
    }
}

#[test]
fn test_empty_secret_is_not_rewritten() {
    let walked = seeded(9).walk(&Document::from(json!({"password": ""})));
    assert_eq!(walked, Document::from(json!({"password": ""})));
}

#[test]
fn test_ip_with_whitespace_is_not_an_address() {
    let walked = seeded(10).walk(&Document::from(json!({"ip": " 81.2.69.142"})));
    assert_eq!(walked.get("ip").and_then(Document::as_str), Some(" 81.2.69.142"));
}

#[test]
fn test_non_ascii_secret_is_not_a_path() {
    let walked = seeded(11).walk(&Document::from(json!({"password": "clé/secrète-42"})));
    assert_eq!(walked.get("password").and_then(Document::as_str), Some("{{}}"));
}

#[test]
fn test_wide_mapping_walks_in_order() {
    let count = 40_000;
    let mut hosts = Mapping::with_capacity(count);
    for idx in 0..count {
        hosts.insert(format!("web{idx:05}"), "81.2.69.142");
    }
    let document = Document::from(hosts);

    let walked = seeded(12).walk(&document);
    assert_eq!(walked.shape(), document.shape());

    let mapping = walked.as_mapping().unwrap();
    assert_eq!(mapping.len(), count);
    assert_eq!(mapping.keys().last(), Some(&Scalar::from("web39999")));
    assert!(mapping
        .iter()
        .all(|(_, value)| value.as_str() == Some("81.2.69.1")));
}

#[test]
fn test_batch_stops_at_first_malformed_document() {
    let docs = [
        "- name: first\n  password: 'Xk9#vT2q'\n",
        "- name: second\n",
        "- name: [never closed\n",
        "- name: {also: broken\n",
    ];

    let err = anonymize_batch(&docs).unwrap_err();
    match err {
        AnonymizerError::MalformedDocument { index, reason } => {
            assert_eq!(index, 2);
            assert!(!reason.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_batch_preserves_length_and_order() {
    let docs = vec![
        "- debug:\n    msg: one\n".to_string(),
        "- debug:\n    msg: two\n".to_string(),
        "- debug:\n    msg: three\n".to_string(),
    ];

    let anonymized = anonymize_batch(&docs).unwrap();
    assert_eq!(anonymized.len(), 3);
    for (input, output) in docs.iter().zip(&anonymized) {
        let input: serde_yml::Value = serde_yml::from_str(input).unwrap();
        let output: serde_yml::Value = serde_yml::from_str(output).unwrap();
        assert_eq!(input, output);
    }
}

#[test]
fn test_batch_keeps_yaml_scalar_types() {
    let doc = "- name: types\n  port: 8080\n  ratio: 0.5\n  enabled: false\n  owner: ~\n  offset: -3\n";
    let anonymized = anonymize_batch(&[doc]).unwrap();

    let input: serde_yml::Value = serde_yml::from_str(doc).unwrap();
    let output: serde_yml::Value = serde_yml::from_str(&anonymized[0]).unwrap();
    assert_eq!(input, output);
}

#[test]
fn test_single_element_batch_matches_anonymize_text() {
    let doc = "- name: plain\n  state: present\n";
    let batch = anonymize_batch(&[doc]).unwrap();
    let single = task_anonymizer::anonymize_text(doc).unwrap();
    assert_eq!(batch, vec![single]);
}
