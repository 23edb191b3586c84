use fixture_core::{
    EntropyProfile, GenerationPlan, KnownSignature, PlanConfig, PlanError, SectionPlan, Signature,
    KIB, MIB,
};
use fixture_forge::{generate_to_file, StreamWriter};
use tempfile::TempDir;

fn generate(plan: GenerationPlan) -> Vec<u8> {
    let total = plan.total_size();
    let mut writer = StreamWriter::with_plan(Vec::new(), plan);
    let metrics = writer.run().unwrap();
    assert_eq!(metrics.bytes_written, total);
    writer.into_inner()
}

fn log_text_plan() -> GenerationPlan {
    let sections = SectionPlan::single(MIB, EntropyProfile::LogText).unwrap();
    GenerationPlan::new(
        64 * KIB,
        42,
        sections,
        vec![Signature::known(0, KnownSignature::Elf)],
    )
    .unwrap()
}

#[test]
fn test_log_text_file_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");

    generate_to_file(log_text_plan(), &first, false).unwrap();
    generate_to_file(log_text_plan(), &second, false).unwrap();

    let first = std::fs::read(first).unwrap();
    let second = std::fs::read(second).unwrap();
    assert_eq!(first.len(), 1_048_576);
    assert_eq!(&first[..16], KnownSignature::Elf.bytes());
    assert_eq!(first, second);
}

#[test]
fn test_log_text_is_printable_after_signature() {
    let output = generate(log_text_plan());
    let text = &output[16..];
    assert!(text
        .iter()
        .all(|b| *b == b'\n' || (0x20..0x7f).contains(b)));
    assert!(text.iter().filter(|b| **b == b'\n').count() > 1000);
}

#[test]
fn test_zero_section_without_signatures() {
    let sections = SectionPlan::single(32, EntropyProfile::Zero).unwrap();
    let plan = GenerationPlan::new(16, 42, sections, Vec::new()).unwrap();
    assert_eq!(generate(plan), vec![0u8; 32]);
}

#[test]
fn test_content_is_independent_of_chunk_size() {
    let small = generate(GenerationPlan::with_defaults(MIB, 4 * KIB, 42).unwrap());
    let large = generate(GenerationPlan::with_defaults(MIB, MIB, 42).unwrap());
    let odd = generate(GenerationPlan::with_defaults(MIB, 12 * KIB, 42).unwrap());

    assert_eq!(small.len(), MIB as usize);
    assert_eq!(small, large);
    assert_eq!(small, odd);
}

#[test]
fn test_seed_changes_content() {
    let a = generate(GenerationPlan::with_defaults(64 * KIB, 16 * KIB, 1).unwrap());
    let b = generate(GenerationPlan::with_defaults(64 * KIB, 16 * KIB, 2).unwrap());
    assert_ne!(a, b);
}

#[test]
fn test_record_invariants() {
    let sections = SectionPlan::single(64 * KIB + 20, EntropyProfile::StructuredRecord).unwrap();
    let plan = GenerationPlan::new(4 * KIB, 42, sections, Vec::new()).unwrap();
    let output = generate(plan);

    let records: Vec<&[u8]> = output.chunks_exact(32).collect();
    assert_eq!(records.len(), 2048);
    for (expected_id, record) in records.iter().enumerate() {
        let id = u32::from_le_bytes(record[0..4].try_into().unwrap());
        let timestamp = i64::from_le_bytes(record[4..12].try_into().unwrap());
        let value = u32::from_le_bytes(record[12..16].try_into().unwrap());

        assert_eq!(id as usize, expected_id);
        let jitter = timestamp - 1_700_000_000 - i64::from(id) * 100;
        assert!((0..=50).contains(&jitter), "record {id} jitter {jitter}");
        assert!(value <= 1_000_000);
    }
}

#[test]
fn test_default_layout_signatures_and_zero_regions() {
    let plan = GenerationPlan::with_defaults(4 * MIB, 256 * KIB, 42).unwrap();
    let signatures: Vec<Signature> = plan.signatures().iter().cloned().collect();
    let zero_sections: Vec<(u64, u64)> = plan
        .sections()
        .iter()
        .filter(|s| s.profile == EntropyProfile::Zero)
        .map(|s| (s.start_offset, s.end()))
        .collect();
    let output = generate(plan);

    let offsets: Vec<u64> = signatures.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0, 1024, 4 * MIB - 1024]);
    for signature in &signatures {
        let start = signature.offset as usize;
        assert_eq!(&output[start..start + signature.bytes.len()], &signature.bytes[..]);
    }

    assert_eq!(zero_sections, vec![(3 * MIB, 4 * MIB)]);
    for (start, end) in zero_sections {
        for offset in start..end {
            let covered = signatures
                .iter()
                .any(|s| s.offset <= offset && offset < s.end());
            if !covered {
                assert_eq!(output[offset as usize], 0, "offset {offset}");
            }
        }
    }
}

#[test]
fn test_mixed_plan_fixture() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/mixed_plan.yaml");
    let plan = PlanConfig::from_file(path).unwrap().build().unwrap();

    assert_eq!(plan.total_size(), 256 * KIB);
    assert_eq!(plan.chunk_size(), 16 * KIB);
    assert_eq!(plan.seed(), 7);
    assert_eq!(plan.sections().len(), 10);
    assert_eq!(plan.signatures().len(), 5);

    let signatures: Vec<Signature> = plan.signatures().iter().cloned().collect();
    let output = generate(plan.clone());
    for signature in &signatures {
        let start = signature.offset as usize;
        assert_eq!(&output[start..start + signature.bytes.len()], &signature.bytes[..]);
    }

    // Zero block at 128K carries only the ZIP header
    assert!(output[128 * 1024 + 16..144 * 1024].iter().all(|b| *b == 0));
    assert_eq!(generate(plan), output);
}

#[test]
fn test_invalid_plans_fail_before_writing() {
    let sections = SectionPlan::single(64, EntropyProfile::Random).unwrap();
    let err = GenerationPlan::new(
        16,
        42,
        sections.clone(),
        vec![Signature::known(8, KnownSignature::Elf)],
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::CrossesChunkBoundary { .. }));

    let err = GenerationPlan::new(
        64,
        42,
        sections,
        vec![
            Signature::known(0, KnownSignature::Elf),
            Signature::known(8, KnownSignature::Png),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, PlanError::SignatureOverlap { .. }));
}
