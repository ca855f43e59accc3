//! Contract Invariant Tests
//!
//! These tests verify the guarantees renderers rely on.

use catalogue_core::{
    barcode::is_valid_ean13,
    encode, AssembleRequest, BatchPlanner, CatalogueAssembler, CatalogueError, Item, LayoutAssignment, LayoutId,
    LayoutSpec, Severity, TextField,
};

fn catalogue_items(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            Item::new(format!("978-0-306-406{:02}", i), format!("Volume {}", i + 1))
                .with_description(format!("Description of volume {}", i + 1))
        })
        .collect()
}

fn request(items: Vec<Item>, layouts: &[&str]) -> AssembleRequest {
    AssembleRequest {
        items,
        layout: LayoutSpec::PerItem(layouts.iter().map(|s| s.to_string()).collect()),
        mixed_context: None,
    }
}

#[test]
fn invariant_isbn_reference_symbol() {
    let encoded = encode("978030640615").unwrap();
    assert_eq!(encoded.symbol, "9780306406157");
    assert!(is_valid_ean13(&encoded.symbol));
}

#[test]
fn invariant_mixed_boundaries_start_new_pages() {
    let items = catalogue_items(6);
    let catalogue = CatalogueAssembler::default()
        .assemble_request(&request(items.clone(), &["2", "2", "1", "3", "3", "3"]))
        .unwrap();

    let shape: Vec<_> = catalogue.pages.iter().map(|p| (p.layout, p.filled())).collect();
    assert_eq!(
        shape,
        vec![(LayoutId::Density2, 2), (LayoutId::Density1, 1), (LayoutId::Density3, 3)]
    );

    let order: Vec<_> = catalogue
        .pages
        .iter()
        .flat_map(|p| p.items().map(|a| a.item.identifier.clone()))
        .collect();
    let expected: Vec<_> = items.iter().map(|i| i.identifier.clone()).collect();
    assert_eq!(order, expected);
}

#[test]
fn invariant_length_mismatch_yields_no_pages() {
    let result = CatalogueAssembler::default()
        .assemble_request(&request(catalogue_items(6), &["2", "2", "1", "3", "3"]));

    assert!(matches!(
        result,
        Err(CatalogueError::AssignmentLengthMismatch { layouts: 5, items: 6 })
    ));
}

#[test]
fn invariant_unknown_layout_is_fatal() {
    let err = CatalogueAssembler::default()
        .assemble_request(&request(catalogue_items(2), &["2", "density-16"]))
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("Unknown layout: density-16"));
}

#[test]
fn invariant_missing_data_is_not_an_error() {
    let items = vec![Item::new("", "No code, no text")];
    let catalogue = CatalogueAssembler::default()
        .assemble_request(&AssembleRequest {
            items,
            layout: LayoutSpec::Uniform("density-1".into()),
            mixed_context: None,
        })
        .unwrap();

    let annotated = catalogue.pages[0].items().next().unwrap();
    assert!(annotated.barcode.is_none());
    for field in TextField::ALL {
        assert_eq!(annotated.verdict(field).unwrap().severity, Severity::None);
    }
    assert!(catalogue.warnings.is_empty());
}

#[test]
fn invariant_mild_boundary_surfaces_warning() {
    let items = vec![Item::new("1", "Boundary").with_description("d".repeat(1250))];
    let catalogue = CatalogueAssembler::default()
        .assemble_request(&AssembleRequest {
            items,
            layout: LayoutSpec::Uniform("1".into()),
            mixed_context: None,
        })
        .unwrap();

    assert_eq!(catalogue.warnings.len(), 1);
    let verdict = &catalogue.warnings[0].verdict;
    assert_eq!(verdict.percent_over, 25.0);
    assert_eq!(verdict.severity, Severity::Mild);
    // text is classified, not cut
    let annotated = catalogue.pages[0].items().next().unwrap();
    assert_eq!(annotated.item.description.as_ref().map(|d| d.len()), Some(1250));
}

#[test]
fn invariant_assembly_deterministic() {
    let req = request(catalogue_items(7), &["4", "4", "4", "8", "8", "2-int", "2-int"]);
    let assembler = CatalogueAssembler::default();
    let a = assembler.assemble_request(&req).unwrap();
    let b = assembler.assemble_request(&req).unwrap();

    assert_eq!(a.pages, b.pages);
    assert_eq!(a.job_hash, b.job_hash);
    assert_eq!(
        assembler.manifest(&a).unwrap().pages_hash,
        assembler.manifest(&b).unwrap().pages_hash
    );
}

#[test]
fn invariant_uniform_pages_padded_to_capacity() {
    let items = catalogue_items(10);
    let pages = BatchPlanner::default()
        .plan(&items, &LayoutAssignment::Uniform(LayoutId::Density4))
        .unwrap();

    assert_eq!(pages.len(), 3);
    assert!(pages.iter().all(|p| p.slots.len() == 4));
    assert_eq!(pages[2].filled(), 2);
    assert!(pages[2].slots[2].is_none() && pages[2].slots[3].is_none());
}

#[test]
fn invariant_request_round_trips_from_json() {
    let payload = r#"{
        "items": [
            {"identifier": "9780306406157", "title": "Optics", "authorBio": "A physicist."},
            {"identifier": "SKU 12", "title": "Lens Cloth", "tags": ["accessory"]}
        ],
        "layout": "density-2-internal"
    }"#;
    let req: AssembleRequest = serde_json::from_str(payload).unwrap();
    let catalogue = CatalogueAssembler::default().assemble_request(&req).unwrap();

    assert_eq!(catalogue.pages.len(), 1);
    assert_eq!(catalogue.pages[0].layout, LayoutId::Density2Internal);
    let symbols: Vec<_> = catalogue.pages[0]
        .items()
        .map(|a| a.barcode.as_ref().unwrap().symbol.clone())
        .collect();
    assert_eq!(symbols[0], "9780306406157");
    assert!(symbols[1].starts_with("000000000012"));
}

#[cfg(feature = "test-hooks")]
#[test]
fn invariant_each_item_annotated_once() {
    use catalogue_core::assembler::{get_annotation_call_count, reset_annotation_call_count};

    reset_annotation_call_count();
    let items = catalogue_items(9);
    CatalogueAssembler::default()
        .assemble(&items, &LayoutAssignment::Uniform(LayoutId::Density4), false)
        .unwrap();
    assert_eq!(get_annotation_call_count(), 9);
}
