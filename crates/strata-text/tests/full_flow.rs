use strata_core::partition::FixedSizePartitioner;
use strata_core::summarize::ExtractiveSummarizer;
use strata_core::{create_summarizer, Document, IndexBuilder, LayerBuilder, LayerIndex, QueryEngine, QueryParams, Result};
use strata_text::TantivyIndexBuilder;

const TOPICS: [&str; 10] = ["firecraft", "water", "shelter", "gardening", "canning", "solar", "radio", "first aid", "forging", "weaving"];

fn essay(_: &str) -> Result<Vec<Document>> {
    Ok(TOPICS
        .iter()
        .enumerate()
        .map(|(i, t)| Document::new(format!("essay:{i}"), format!("Notes on {t} basics. The {t} chapter goes into detail.")))
        .collect())
}

#[test]
fn tantivy_full_flow() {
    let partitioner = FixedSizePartitioner::new(4).expect("partitioner");
    let summarizer = ExtractiveSummarizer::new();
    let indexer = TantivyIndexBuilder::in_ram();
    let builder = LayerBuilder::new(&partitioner, &summarizer, &indexer);
    let resource = create_summarizer("essay", &essay, &builder).expect("summarizer");

    let sizes: Vec<usize> = resource.layers().iter().map(|l| l.len()).collect();
    assert_eq!(sizes, vec![10, 3, 1]);

    let params = QueryParams::default();
    let detailed = resource.query("radio", 0, &params).expect("level 0");
    assert_eq!(detailed.sources.first().map(|s| s.document_id.as_str()), Some("essay:6"));
    assert!(detailed.answer.contains("The radio chapter"));

    // level 1 only kept lead sentences, grouped four at a time
    let middle = resource.query("radio", 1, &params).expect("level 1");
    assert_eq!(middle.sources.len(), 1);
    assert!(middle.answer.starts_with("Notes on canning basics."));
    assert!(!middle.answer.contains("chapter"));

    let top = resource.query("firecraft", 2, &params).expect("level 2");
    assert_eq!(top.sources.len(), 1);
    assert!(resource.query("firecraft", 3, &params).is_err());
}

#[test]
fn results_are_ordered_and_limited() {
    let indexer = TantivyIndexBuilder::in_ram();
    let docs = vec![
        Document::new("a", "solar panels"),
        Document::new("b", "solar solar solar panels and solar batteries"),
        Document::new("c", "wind turbines"),
    ];
    let index = indexer.create_index(&docs).expect("index");
    assert_eq!(index.len(), 3);

    let engine = index.query_engine(&QueryParams::default()).expect("engine");
    let response = engine.query("solar").expect("query");
    let ids: Vec<_> = response.sources.iter().map(|s| s.document_id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(response.sources[0].score >= response.sources[1].score);
    assert!(!ids.contains(&"c"));

    let one = index.query_engine(&QueryParams::default().with_top_k(1)).expect("engine").query("solar").expect("query");
    assert_eq!(one.sources.len(), 1);

    let none = index.query_engine(&QueryParams::default().with_top_k(0)).expect("engine").query("solar").expect("query");
    assert!(none.sources.is_empty());
}

#[test]
fn malformed_query_is_parsed_leniently() {
    let index = TantivyIndexBuilder::in_ram().create_index(&[Document::new("a", "canning tomatoes")]).expect("index");
    let response = index.query_engine(&QueryParams::default()).expect("engine").query("canning AND (").expect("query");
    assert_eq!(response.sources.len(), 1);
}

#[test]
fn empty_collection_is_indexable() {
    let index = TantivyIndexBuilder::in_ram().create_index(&[]).expect("index");
    assert!(index.is_empty());
    let response = index.query_engine(&QueryParams::default()).expect("engine").query("anything").expect("query");
    assert!(response.sources.is_empty());
    assert!(response.answer.is_empty());
}

#[test]
fn persistent_indexes_get_one_directory_per_layer() {
    let tmp = tempfile::tempdir().expect("tmp");
    let partitioner = FixedSizePartitioner::new(4).expect("partitioner");
    let summarizer = ExtractiveSummarizer::new();
    let indexer = TantivyIndexBuilder::persistent(tmp.path());
    let builder = LayerBuilder::new(&partitioner, &summarizer, &indexer);
    let resource = create_summarizer("essay", &essay, &builder).expect("summarizer");

    assert_eq!(resource.levels_of_detail(), 3);
    for level in 0..3 {
        assert!(tmp.path().join(format!("layer-{level:03}")).join("meta.json").exists());
    }
    assert!(!tmp.path().join("layer-003").exists());
}

#[test]
fn reused_persistent_builder_leaves_no_stale_layers() {
    let tmp = tempfile::tempdir().expect("tmp");
    let partitioner = FixedSizePartitioner::new(4).expect("partitioner");
    let summarizer = ExtractiveSummarizer::new();
    let indexer = TantivyIndexBuilder::persistent(tmp.path());
    let builder = LayerBuilder::new(&partitioner, &summarizer, &indexer);
    assert_eq!(create_summarizer("essay", &essay, &builder).expect("deep").levels_of_detail(), 3);

    let short = |_: &str| -> Result<Vec<Document>> { Ok(essay("")?.into_iter().take(3).collect()) };
    let resource = create_summarizer("short", &short, &builder).expect("shallow");
    assert_eq!(resource.levels_of_detail(), 2);
    assert!(tmp.path().join("layer-000").join("meta.json").exists());
    assert!(tmp.path().join("layer-001").join("meta.json").exists());
    assert!(!tmp.path().join("layer-002").exists());
    assert!(resource.query("firecraft", 1, &QueryParams::default()).is_ok());
}
