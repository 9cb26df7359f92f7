use bytepool_graph::graph::{EdgeMode, Graph};
use bytepool_graph::token::GhostToken;
use bytepool_graph::value::TaggedValue;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_graph_sparse_remove(c: &mut Criterion) {
    let size = 1000;

    c.bench_function("directed_graph_sparse_remove", |b| {
        b.iter(|| {
            GhostToken::new(|mut token| {
                let graph: Graph<usize, TaggedValue> =
                    Graph::new(EdgeMode::Directed, size, size);
                let mut nodes = Vec::with_capacity(size);
                for i in 0..size {
                    nodes.push(graph.add_vertex(&mut token, i).unwrap());
                }
                // Chain: 0->1->...->N
                for i in 0..size - 1 {
                    graph
                        .add_edge(&mut token, nodes[i], nodes[i + 1], TaggedValue::ZERO)
                        .unwrap();
                }

                black_box(graph.remove_vertex(&mut token, nodes[size / 2]).unwrap());
            })
        });
    });

    c.bench_function("undirected_graph_sparse_remove", |b| {
        b.iter(|| {
            GhostToken::new(|mut token| {
                let graph: Graph<usize, TaggedValue> =
                    Graph::new(EdgeMode::Undirected, size, size);
                let mut nodes = Vec::with_capacity(size);
                for i in 0..size {
                    nodes.push(graph.add_vertex(&mut token, i).unwrap());
                }
                for i in 0..size - 1 {
                    graph
                        .add_edge(&mut token, nodes[i], nodes[i + 1], TaggedValue::ZERO)
                        .unwrap();
                }

                black_box(graph.remove_vertex(&mut token, nodes[size / 2]).unwrap());
            })
        });
    });
}

fn bench_graph_bfs(c: &mut Criterion) {
    use bytepool_graph::graph::traversal::{BfsState, Callbacks};
    let size = 1000;

    c.bench_function("graph_bfs_tree", |b| {
        b.iter(|| {
            GhostToken::new(|mut token| {
                let graph: Graph<usize, TaggedValue> =
                    Graph::new(EdgeMode::Directed, size, size);
                let mut nodes = Vec::with_capacity(size);
                for i in 0..size {
                    nodes.push(graph.add_vertex(&mut token, i).unwrap());
                }
                // Tree-like structure
                for i in 1..size {
                    graph
                        .add_edge(&mut token, nodes[i / 2], nodes[i], TaggedValue::ZERO)
                        .unwrap();
                }

                let mut state = BfsState::new(&graph, &token, size);
                let mut count = 0usize;
                {
                    let mut callbacks: Callbacks<usize, TaggedValue> = Callbacks::none();
                    callbacks.on_vertex_early = Some(Box::new(|_, _| count += 1));
                    state
                        .run(&graph, &mut token, nodes[0], callbacks)
                        .unwrap();
                }
                black_box(count);
            })
        });
    });
}

criterion_group!(benches, bench_graph_sparse_remove, bench_graph_bfs);
criterion_main!(benches);
