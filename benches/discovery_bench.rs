use criterion::{Criterion, criterion_group, criterion_main};
use fixture_harness::ProviderRegistry;
use std::fs;
use tempfile::TempDir;

fn fixture_dir(count: usize, with_manifest: bool) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let mut manifest = String::new();
    for i in 0..count {
        let name = format!("case_{i:04}.impala");
        fs::write(dir.path().join(&name), "fn main() {}\n").unwrap();
        fs::write(dir.path().join(format!("case_{i:04}.output")), "").unwrap();
        manifest.push_str(&format!("[[tests]]\nname = \"{name}\"\nargs = [\"{name}\"]\n\n"));
    }
    if with_manifest {
        fs::write(dir.path().join("tests.toml"), manifest).unwrap();
    }
    dir
}

fn bench_discovery(c: &mut Criterion) {
    let registry = ProviderRegistry::default();

    let convention = fixture_dir(200, false);
    c.bench_function("resolve_convention_200", |b| {
        b.iter(|| registry.resolve(convention.path()).unwrap());
    });

    let manifest = fixture_dir(200, true);
    c.bench_function("resolve_manifest_200", |b| {
        b.iter(|| registry.resolve(manifest.path()).unwrap());
    });
}

criterion_group!(benches, bench_discovery);
criterion_main!(benches);
