// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use docket_bnb::{
    bnb::SuggestionSolver,
    config::SearchConfig,
    query::SuggestionQuery,
};
use docket_model::{
    index::{RequestIndex, SectionIndex},
    location::Location,
    model::{ModelBuilder, SchedulingModel},
    request::Student,
    time::TimePattern,
};
use std::hint::black_box;
use std::time::Duration;

/// A term of `num_courses` courses, each with a lecture subpart of
/// `sections` sections and a recitation child subpart. Meeting times are
/// spread deterministically over the week so that some pairs collide.
fn build_term(num_courses: usize, sections: usize) -> (SchedulingModel, Student, SuggestionQuery) {
    let mut b = ModelBuilder::new();
    let mut student = Student::new(1);
    let mut current: Vec<Vec<SectionIndex>> = Vec::with_capacity(num_courses);
    let mut id = 1u64;

    for c in 0..num_courses {
        let course = b.add_course(1000 + c as u64, format!("C{}", c));
        let lec = b.add_subpart(course, 1, "Lec", None).unwrap();
        let rec = b.add_subpart(course, 2, "Rec", Some(lec)).unwrap();
        let mut chosen = Vec::new();
        for s in 0..sections {
            let l = b.add_section(lec, id, format!("L{}", s)).unwrap();
            id += 1;
            let days = [0b00101u8, 0b01010, 0b10001][(c + s) % 3];
            let start = 96 + 12 * ((c * 5 + s * 3) % 9) as u16;
            b.set_section_time(l, TimePattern::new(days, start, 10).unwrap())
                .set_section_location(l, Location::new((c * 7 % 11) as f64, (s * 5 % 13) as f64));
            for r in 0..2 {
                let x = b.add_section(rec, id, format!("R{}{}", s, r)).unwrap();
                id += 1;
                let days = 1u8 << ((c + s + r) % 5);
                let start = 180 + 12 * ((c + 2 * s + r) % 6) as u16;
                b.set_section_parent(x, l)
                    .set_section_time(x, TimePattern::new(days, start, 10).unwrap());
                if s == 0 && r == 0 {
                    chosen = vec![l, x];
                }
            }
        }
        student.add_course_request(c as u64, vec![course]).unwrap();
        current.push(chosen);
    }
    student.add_free_time_request(99, TimePattern::new(0b00100, 144, 24).unwrap());

    let selected = RequestIndex::new(0);
    let mut query = SuggestionQuery::new(selected);
    query.select_section(current[0][0]);
    for (i, sections) in current.iter().enumerate() {
        for &s in sections {
            query.prefer_section(RequestIndex::new(i), s);
        }
    }
    (b.build().unwrap(), student, query)
}

fn bench_suggestions(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggestion_benchmark");
    let config = SearchConfig::builder()
        .timeout(Duration::from_secs(10))
        .max_suggestions(20)
        .build()
        .unwrap();

    for &(num_courses, sections) in &[(3usize, 3usize), (4, 4), (5, 4), (6, 3)] {
        let (model, student, query) = build_term(num_courses, sections);
        let mut solver = SuggestionSolver::preallocated(num_courses + 1, sections * 2 + 1);

        group.throughput(Throughput::Elements(student.num_requests() as u64));
        group.bench_with_input(
            BenchmarkId::new("cheapest_first", format!("{}x{}", num_courses, sections)),
            &model,
            |b, model| {
                b.iter(|| {
                    let outcome = solver
                        .solve(
                            black_box(model),
                            black_box(&student),
                            black_box(&query),
                            black_box(&config),
                        )
                        .unwrap();
                    black_box(outcome.len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_suggestions);
criterion_main!(benches);
