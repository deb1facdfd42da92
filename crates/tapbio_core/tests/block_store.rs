use chrono::{TimeZone, Utc};
use serde_json::json;
use tapbio_core::render::{render_page, BlockBody, RenderContext};
use tapbio_core::{
    Animation, BlockContent, BlockPatch, BlockType, PageStore, PlatformTarget, Snapshot,
};

fn ids(store: &PageStore) -> Vec<String> {
    store.blocks().iter().map(|block| block.id.clone()).collect()
}

#[test]
fn added_blocks_carry_kind_and_fresh_ids() {
    let mut store = PageStore::seeded(Utc::now());
    let mut seen = ids(&store);

    for kind in BlockType::ALL {
        let id = store.add_block(kind);
        assert!(!seen.contains(&id), "id {id} reused");
        seen.push(id.clone());

        let block = store.block(&id).unwrap();
        assert_eq!(block.kind(), kind);
        assert!(block.visible);
        assert_eq!(block.animation, Animation::None);
    }
    assert_eq!(store.blocks().len(), 4 + BlockType::ALL.len());
}

#[test]
fn link_defaults_target_all_platforms() {
    let mut store = PageStore::seeded(Utc::now());
    let id = store.add_block(BlockType::Link);
    let block = store.block(&id).unwrap();

    assert_eq!(block.platform_target, Some(PlatformTarget::All));
    match &block.content {
        BlockContent::Link(link) => {
            assert_eq!(link.title, "New Link");
            assert_eq!(link.url, "");
            assert_eq!(link.icon, "Link");
        }
        other => panic!("unexpected content: {other:?}"),
    }
}

#[test]
fn remove_keeps_relative_order() {
    let mut store = PageStore::seeded(Utc::now());
    assert!(store.remove_block("2"));
    assert_eq!(ids(&store), vec!["1", "3", "4"]);

    let revision = store.revision();
    assert!(!store.remove_block("2"));
    assert_eq!(ids(&store), vec!["1", "3", "4"]);
    assert_eq!(store.revision(), revision);
}

#[test]
fn update_never_touches_id_or_type() {
    let mut store = PageStore::seeded(Utc::now());
    let patch: BlockPatch = serde_json::from_value(json!({
        "id": "hijack",
        "type": "poll",
        "title": "Work",
        "animation": "glow"
    }))
    .unwrap();

    assert!(store.update_block("1", &patch));
    let block = store.block("1").unwrap();
    assert_eq!(block.kind(), BlockType::Link);
    assert_eq!(block.animation, Animation::Glow);
    match &block.content {
        BlockContent::Link(link) => {
            assert_eq!(link.title, "Work");
            assert_eq!(link.url, "https://example.com");
        }
        other => panic!("unexpected content: {other:?}"),
    }
    assert!(store.block("hijack").is_none());
    assert!(!store.update_block("missing", &patch));
}

#[test]
fn reorder_with_permutation_keeps_block_set() {
    let mut store = PageStore::seeded(Utc::now());
    let mut reversed = store.blocks().to_vec();
    reversed.reverse();

    store.reorder_blocks(reversed);
    assert_eq!(ids(&store), vec!["4", "3", "2", "1"]);

    let mut sorted = ids(&store);
    sorted.sort();
    assert_eq!(sorted, vec!["1", "2", "3", "4"]);
}

#[test]
fn snapshot_json_round_trips_with_wire_names() {
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let mut store = PageStore::seeded(now);
    store.add_block_at(BlockType::Poll, now);
    store.add_block_at(BlockType::Vcard, now);
    let snapshot = store.snapshot();

    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["blocks"][0]["type"], "link");
    assert_eq!(value["blocks"][0]["platformTarget"], "all");
    assert_eq!(value["blocks"][1]["targetDate"], "2026-04-04T09:00:00.000Z");
    assert_eq!(value["blocks"][4]["optionA"], "Video");
    assert_eq!(value["blocks"][5]["buttonLabel"], "Save Contact");
    assert_eq!(value["theme"]["buttonTransparency"], 1.0);
    assert_eq!(value["seo"]["metaDescription"], "Check out my links and updates.");

    let restored: Snapshot = serde_json::from_value(value).unwrap();
    assert_eq!(restored, snapshot);
}

#[test]
fn missing_visible_and_animation_take_defaults() {
    let block: tapbio_core::PageBlock = serde_json::from_value(json!({
        "id": "a",
        "type": "copy",
        "label": "Code",
        "content": "X1"
    }))
    .unwrap();

    assert!(block.visible);
    assert_eq!(block.animation, Animation::None);
}

#[test]
fn toggled_link_leaves_preview_but_stays_stored() {
    let now = Utc::now();
    let mut store = PageStore::seeded(now);
    let id = store.add_block(BlockType::Link);
    store.update_block(
        &id,
        &BlockPatch {
            url: Some("https://x.com".to_string()),
            title: Some("X".to_string()),
            ..BlockPatch::default()
        },
    );
    assert_eq!(store.toggle_block_visibility(&id), Some(false));

    let view = render_page(store.state(), &RenderContext::editor(now));
    assert!(view.blocks.iter().all(|block| block.id != id));
    assert_eq!(view.blocks.len(), 4);

    let stored = store.block(&id).unwrap();
    assert!(!stored.visible);
    match &stored.content {
        BlockContent::Link(link) => {
            assert_eq!(link.url, "https://x.com");
            assert_eq!(link.title, "X");
        }
        other => panic!("unexpected content: {other:?}"),
    }
}

#[test]
fn seeded_countdown_shows_days_left() {
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();
    let store = PageStore::seeded(now);
    let view = render_page(store.state(), &RenderContext::editor(now));

    match &view.blocks[1].body {
        BlockBody::Countdown { title, days_left } => {
            assert_eq!(title, "Next Drop");
            assert_eq!(*days_left, 3);
        }
        other => panic!("unexpected body: {other:?}"),
    }
}
