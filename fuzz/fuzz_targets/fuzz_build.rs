#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|documents: Vec<String>| {
    // Any set of documents builds, and each comes back as exactly its own suffixes
    let mut builder = gst::tree::SuffixTreeBuilder::with_defaults();
    for document in documents.iter().take(8) {
        builder.add_document(document).unwrap();
    }
    let built = builder.build().unwrap();

    let text = built.tree.text();
    assert_eq!(built.root().leaf_count(), text.len());
    for entry in built.tree.suffixes() {
        let end = text.segment_end(entry.start);
        assert_eq!(entry.suffix.as_slice(), &text.chars()[entry.start..=end]);
    }
});
