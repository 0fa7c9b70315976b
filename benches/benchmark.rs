use std::hint::black_box;

use bakery::Recipe;
use bakery::scanner::{Termination, statements};
use criterion::{Criterion, criterion_group, criterion_main};

fn synthetic_recipe(statements: usize) -> String {
    let mut text = String::from("// generated\n");
    for n in 0..statements {
        match n % 3 {
            0 => text.push_str(&format!("owner(#ambient, \"user{n}\", \"/home/user{n}/file\");\n")),
            1 => text.push_str(&format!(
                "right(#authority, $file, #read) <-\n    resource(#ambient, $file),\n    owner(#ambient, \"user{n}\", $file);\n"
            )),
            _ => text.push_str(&format!(
                "[ok($file) <- resource(#ambient, $file) @ prefix($file, \"/home/user{n}\"), $file not in [\"/etc\"]];\n"
            )),
        }
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for size in [10, 1_000, 10_000] {
        let text = synthetic_recipe(size);
        c.bench_function(&format!("scan {size}"), |b| {
            b.iter(|| statements(black_box(&text), Termination::Lenient).count())
        });
        c.bench_function(&format!("load {size}"), |b| {
            b.iter(|| Recipe::parse("bench", black_box(&text)))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
