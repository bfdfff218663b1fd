use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use vcon_core::color::Rgba;
use vcon_core::config::DisplayConfig;
use vcon_render::bitmap::GlyphBitmap;
use vcon_render::glyph_runs::{encode, encode_into};
use vcon_render::headless::HeadlessEnvironment;
use vcon_render::run_cache::GlyphRunCache;
use vcon_render::surrogate::SurrogateNode;
use vcon_render::{Host, RingSurface, ScrollableSurface, font};

fn font_bitmaps() -> Vec<GlyphBitmap> {
    font::charset().filter_map(font::glyph).collect()
}

fn bench_encode(c: &mut Criterion) {
    let glyphs = font_bitmaps();
    let mut group = c.benchmark_group("glyph_runs/encode");
    group.throughput(Throughput::Elements(glyphs.len() as u64));

    for scale in [0u32, 1, 3] {
        group.bench_with_input(BenchmarkId::new("fresh_vec", scale), &scale, |b, &scale| {
            b.iter(|| {
                for g in &glyphs {
                    black_box(encode(black_box(g), scale));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("reused_buffer", scale), &scale, |b, &scale| {
            let mut out = Vec::with_capacity(64);
            b.iter(|| {
                for g in &glyphs {
                    out.clear();
                    encode_into(black_box(g), scale, &mut out);
                    black_box(&out);
                }
            });
        });
    }

    let dense = GlyphBitmap::from_rows16(std::array::from_fn(|i| {
        if i % 2 == 0 { 0xAAAA } else { 0x5555 }
    }));
    group.bench_function("checker16", |b| b.iter(|| black_box(encode(black_box(&dense), 0))));
    group.finish();
}

fn bench_run_cache(c: &mut Criterion) {
    let glyphs = font_bitmaps();
    let mut group = c.benchmark_group("glyph_runs/cache");
    group.throughput(Throughput::Elements(glyphs.len() as u64));
    group.bench_function("warm", |b| {
        let mut cache = GlyphRunCache::default();
        for g in &glyphs {
            cache.get_or_encode(g, 1);
        }
        b.iter(|| {
            for g in &glyphs {
                black_box(cache.get_or_encode(black_box(g), 1));
            }
        });
    });
    group.finish();
}

fn bench_surface(c: &mut Criterion) {
    let mut env = HeadlessEnvironment::new();
    env.add_root("screen");
    let mut host = Host::new(env);
    let mut surface = RingSurface::new(
        SurrogateNode::root("screen"),
        &mut host,
        &DisplayConfig::default(),
    )
    .expect("surface");

    let mut group = c.benchmark_group("ring_surface");
    group.bench_function("pan", |b| {
        b.iter(|| surface.pan(&mut host, black_box(37), black_box(-11)).expect("pan"));
    });

    let mut runs = GlyphRunCache::default();
    let line = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG 0123456789";
    group.throughput(Throughput::Elements(line.len() as u64));
    group.bench_function("paint_text_line", |b| {
        b.iter(|| {
            surface
                .paint_text(&mut host, 0, 3, Rgba::WHITE, black_box(line), &mut runs)
                .expect("paint")
        });
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_run_cache, bench_surface);
criterion_main!(benches);
