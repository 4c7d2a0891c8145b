//! Criterion benchmarks for typed URI parsing and serialization.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use typed_uri::{DataUri, GeoLocation, GeoUri, Parameter, TelUri, UrnUri};
use typed_uri::split::non_quoted_split;

/// Benchmark: wrapper parse for each scheme
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let tel_cases = [
        ("global", "tel:+12025551234"),
        ("local", "tel:7042;phone-context=example.com;ext=22"),
        ("leftovers", r#"tel:+1202;foo=bar;note="a;b,c";flag"#),
    ];
    for (name, uri) in tel_cases {
        group.throughput(Throughput::Bytes(uri.len() as u64));
        group.bench_with_input(BenchmarkId::new("tel", name), &uri, |b, uri| {
            b.iter(|| TelUri::parse(black_box(uri)));
        });
    }

    let geo_cases = [
        ("minimal", "geo:45.5,-122.6"),
        ("full", "geo:45.5,-122.6,35;u=10;crs=wgs84"),
    ];
    for (name, uri) in geo_cases {
        group.throughput(Throughput::Bytes(uri.len() as u64));
        group.bench_with_input(BenchmarkId::new("geo", name), &uri, |b, uri| {
            b.iter(|| GeoUri::parse(black_box(uri)));
        });
    }

    let data_cases = [
        ("text", "data:,Hello%20World"),
        ("charset", "data:text/html;charset=utf-8,%3Cp%3Ehi%3C%2Fp%3E"),
        ("base64", "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg=="),
    ];
    for (name, uri) in data_cases {
        group.throughput(Throughput::Bytes(uri.len() as u64));
        group.bench_with_input(BenchmarkId::new("data", name), &uri, |b, uri| {
            b.iter(|| DataUri::parse(black_box(uri)));
        });
    }

    let urn = "urn:uuid:f81d4fae-7dec-11d0-a765-00a0c91e6bf6";
    group.throughput(Throughput::Bytes(urn.len() as u64));
    group.bench_with_input(BenchmarkId::new("urn", "uuid"), &urn, |b, uri| {
        b.iter(|| UrnUri::parse(black_box(uri)));
    });

    group.finish();
}

/// Benchmark: cache refresh after an in-place edit
fn bench_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit");

    let mut tel = TelUri::parse("tel:7042;phone-context=example.com;ext=22;foo=bar")
        .expect("valid test URI");
    let mut flip = false;
    group.bench_function("tel_extension", |b| {
        b.iter(|| {
            flip = !flip;
            tel.value_mut()
                .set_extension(Some(if flip { "23" } else { "22" }));
            black_box(tel.as_str());
        });
    });

    let mut geo = GeoUri::from_value(GeoLocation::new(10.0, 20.0).expect("valid location"));
    let mut lat = 0.0;
    group.bench_function("geo_latitude", |b| {
        b.iter(|| {
            lat = if lat > 80.0 { 0.0 } else { lat + 1.0 };
            geo.value_mut().set_latitude(black_box(lat)).expect("in range");
            black_box(geo.as_str());
        });
    });

    group.finish();
}

/// Benchmark: quote-aware splitting and parameter decoding
fn bench_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("parameters");

    let counts = [1, 4, 16];
    for count in counts {
        let body: String = (0..count)
            .map(|i| format!(r#";p{i}="v;{i}""#))
            .collect();

        group.bench_with_input(BenchmarkId::new("split", count), &body, |b, body| {
            b.iter(|| non_quoted_split(black_box(body), &[';'], true));
        });
        group.bench_with_input(BenchmarkId::new("parse_list", count), &body, |b, body| {
            b.iter(|| Parameter::parse_list(black_box(body)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_edit, bench_parameters);
criterion_main!(benches);
