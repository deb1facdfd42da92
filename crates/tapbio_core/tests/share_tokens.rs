use chrono::Utc;
use tapbio_core::db::open_db_in_memory;
use tapbio_core::share::{token_from_query, MAX_DECODED_BYTES};
use tapbio_core::{
    decode_share_token, encode_share_token, share_url, BlockType, EditorSession, PageStore,
    SqliteSnapshotRepository,
};

#[test]
fn share_url_carries_decodable_state() {
    let mut store = PageStore::seeded(Utc::now());
    store.add_block(BlockType::Copy);
    let snapshot = store.snapshot();

    let url = share_url("https://tap.bio/", &snapshot).unwrap();
    assert!(url.starts_with("https://tap.bio?view=public&data="));

    let (_, query) = url.split_once('?').unwrap();
    let token = token_from_query(query).unwrap();
    assert_eq!(decode_share_token(token), Some(snapshot));
}

#[test]
fn token_is_much_smaller_than_repetitive_json() {
    let mut store = PageStore::seeded(Utc::now());
    for _ in 0..40 {
        store.add_block(BlockType::Poll);
    }
    let snapshot = store.snapshot();
    let json_len = serde_json::to_string(&snapshot).unwrap().len();
    let token = encode_share_token(&snapshot).unwrap();

    assert!(token.len() < json_len / 2);
    assert!((json_len as u64) < MAX_DECODED_BYTES);
}

#[test]
fn import_replaces_session_state() {
    let mut source = PageStore::seeded(Utc::now());
    source.remove_block("3");
    let token = encode_share_token(&source.snapshot()).unwrap();

    let conn = open_db_in_memory().unwrap();
    let mut session =
        EditorSession::open(SqliteSnapshotRepository::new(&conn), Utc::now()).unwrap();
    assert!(session.import_token(&token).unwrap());

    let ids: Vec<&str> = session
        .snapshot()
        .blocks
        .iter()
        .map(|block| block.id.as_str())
        .collect();
    assert_eq!(ids, vec!["1", "2", "4"]);
}

#[test]
fn tampered_token_is_ignored() {
    let token = encode_share_token(&PageStore::seeded(Utc::now()).snapshot()).unwrap();
    let truncated = &token[..token.len() / 2];

    assert_eq!(decode_share_token(truncated), None);
    assert_eq!(decode_share_token("%%%"), None);
}
