//! End-to-end engine tests with the real symmetric cipher.

use sealenv::error::{CipherError, Error};
use sealenv::{Format, Path, SecureFile, SymmetricCipher};

fn cipher(pass: &str) -> Box<SymmetricCipher> {
    Box::new(SymmetricCipher::new(pass))
}

fn paths(strs: &[&str]) -> Vec<String> {
    strs.iter().map(|s| s.to_string()).collect()
}

fn read(doc: &str, format: Format, path: &str) -> String {
    let tree = format.parse(doc).unwrap();
    Path::parse(path)
        .unwrap()
        .read_from(&tree)
        .unwrap()
        .to_string()
}

#[test]
fn test_encrypt_decrypt_round_trip() {
    let input = "hello: world\na: test\n";
    let secure = paths(&[".hello"]);

    let sealed = SecureFile::from_plaintext(Format::Yaml, input, cipher("p"), &secure)
        .unwrap()
        .export(Format::Yaml)
        .unwrap();

    // The insecure value survives in the clear, the secret does not
    assert!(sealed.contains("a: test\n"));
    assert!(!sealed.contains("world"));

    let decrypted = SecureFile::open(Format::Yaml, &sealed, cipher("p"), &secure)
        .unwrap()
        .export_plaintext(Format::Yaml)
        .unwrap();
    assert_eq!(decrypted, input);
}

#[test]
fn test_unmodified_export_is_byte_identical() {
    let secure = paths(&[".hello", ".a"]);
    let sealed = SecureFile::from_plaintext(
        Format::Yaml,
        "hello: world\na: test\nb: stuff\n",
        cipher("p"),
        &secure,
    )
    .unwrap()
    .export(Format::Yaml)
    .unwrap();

    let again = SecureFile::open(Format::Yaml, &sealed, cipher("p"), &secure)
        .unwrap()
        .export(Format::Yaml)
        .unwrap();

    assert_eq!(again, sealed);
}

#[test]
fn test_only_modified_values_get_fresh_envelopes() {
    let secure = paths(&[".hello", ".a"]);
    let sealed = SecureFile::from_plaintext(
        Format::Yaml,
        "hello: world\na: test\nb: stuff\n",
        cipher("p"),
        &secure,
    )
    .unwrap()
    .export(Format::Yaml)
    .unwrap();

    let mut file = SecureFile::open(Format::Yaml, &sealed, cipher("p"), &secure).unwrap();
    file.update_from(Format::Yaml, "hello: not-world\na: test\nb: stuff\n")
        .unwrap();
    let updated = file.export(Format::Yaml).unwrap();

    // changed secret: new envelope; unchanged secret: identical envelope;
    // insecure value: untouched
    assert_ne!(
        read(&updated, Format::Yaml, ".hello"),
        read(&sealed, Format::Yaml, ".hello")
    );
    assert_eq!(
        read(&updated, Format::Yaml, ".a"),
        read(&sealed, Format::Yaml, ".a")
    );
    assert_eq!(read(&updated, Format::Yaml, ".b"), "stuff");

    // and the new envelope still decrypts to the new plaintext
    let reopened = SecureFile::open(Format::Yaml, &updated, cipher("p"), &secure).unwrap();
    assert_eq!(
        reopened.export_plaintext(Format::Yaml).unwrap(),
        "hello: not-world\na: test\nb: stuff\n"
    );
}

#[test]
fn test_keys_added_in_editor_stay_plaintext_unless_secure() {
    let secure = paths(&[".hello"]);
    let sealed = SecureFile::from_plaintext(Format::Yaml, "hello: world\n", cipher("p"), &secure)
        .unwrap()
        .export(Format::Yaml)
        .unwrap();

    let mut file = SecureFile::open(Format::Yaml, &sealed, cipher("p"), &secure).unwrap();
    file.update_from(Format::Yaml, "hello: world\nb: stuff\n")
        .unwrap();
    let updated = file.export(Format::Yaml).unwrap();

    assert_eq!(
        read(&updated, Format::Yaml, ".hello"),
        read(&sealed, Format::Yaml, ".hello")
    );
    assert_eq!(read(&updated, Format::Yaml, ".b"), "stuff");
}

#[test]
fn test_nested_yaml_with_dotted_keys() {
    let input = concat!(
        "kind: List\n",
        "spec:\n",
        "- kind: ConfigMap\n",
        "  data:\n",
        "    HELLO: world\n",
        "    TEST: foobar\n",
        "    .key.with.dots.single.quote: floof\n",
    );
    let secure = paths(&[
        ".spec[0].data.HELLO",
        ".spec[0].data['.key.with.dots.single.quote']",
    ]);

    let sealed = SecureFile::from_plaintext(Format::Yaml, input, cipher("p"), &secure)
        .unwrap()
        .export(Format::Yaml)
        .unwrap();
    assert!(sealed.contains("TEST: foobar"));
    assert!(!sealed.contains("floof"));

    let decrypted = SecureFile::open(Format::Yaml, &sealed, cipher("p"), &secure)
        .unwrap()
        .export_plaintext(Format::Yaml)
        .unwrap();
    assert_eq!(decrypted, input);
}

#[test]
fn test_set_then_export_json() {
    let mut file =
        SecureFile::from_plaintext(Format::Json, "", cipher("p"), &paths(&[".a.b.c"])).unwrap();
    file.set(".a.b.c", "x").unwrap();
    let sealed = file.export(Format::Json).unwrap();

    let envelope = read(&sealed, Format::Json, ".a.b.c");
    assert!(envelope.bytes().all(|b| b.is_ascii_hexdigit()));

    let reopened =
        SecureFile::open(Format::Json, &sealed, cipher("p"), &paths(&[".a.b.c"])).unwrap();
    assert_eq!(
        reopened.export_plaintext(Format::Json).unwrap(),
        "{\n\t\"a\": {\n\t\t\"b\": {\n\t\t\t\"c\": \"x\"\n\t\t}\n\t}\n}"
    );
}

#[test]
fn test_open_with_wrong_passphrase_fails() {
    let secure = paths(&[".hello"]);
    let sealed = SecureFile::from_plaintext(Format::Yaml, "hello: world\n", cipher("p"), &secure)
        .unwrap()
        .export(Format::Yaml)
        .unwrap();

    let err = SecureFile::open(Format::Yaml, &sealed, cipher("wrong"), &secure).unwrap_err();
    assert!(matches!(err, Error::Cipher(CipherError::Authentication)));
}

#[test]
fn test_dotenv_end_to_end() {
    let input = "# deployment secrets\nAPI_KEY=sk-123\nREGION=us-east-1\n";
    let secure = paths(&[".API_KEY"]);

    let sealed = SecureFile::from_plaintext(Format::Dotenv, input, cipher("p"), &secure)
        .unwrap()
        .export(Format::Dotenv)
        .unwrap();
    assert!(sealed.contains("REGION=us-east-1\n"));
    assert!(!sealed.contains("sk-123"));

    let decrypted = SecureFile::open(Format::Dotenv, &sealed, cipher("p"), &secure)
        .unwrap()
        .export_plaintext(Format::Dotenv)
        .unwrap();

    // comments are dropped on round-trip, values survive
    assert_eq!(decrypted, "API_KEY=sk-123\nREGION=us-east-1\n");
}
