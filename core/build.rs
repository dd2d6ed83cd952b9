use std::env;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    generate_event_npc_set(&out_dir);

    println!("cargo:rerun-if-changed=data/event_npcs.json");
}

fn generate_event_npc_set(out_dir: &str) {
    let json = fs::read_to_string("data/event_npcs.json").expect("failed to read event_npcs.json");

    // Object keys are the NPC ids; the values are only there for humans.
    let mut ids: Vec<i32> = json
        .split('"')
        .enumerate()
        .filter_map(|(i, s)| if i % 2 == 1 { s.parse::<i32>().ok() } else { None })
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let path = Path::new(out_dir).join("event_npcs.rs");
    let mut file = BufWriter::new(fs::File::create(&path).unwrap());

    let mut builder = phf_codegen::Set::new();
    for id in &ids {
        builder.entry(*id);
    }

    writeln!(file, "pub static EVENT_NPC_IDS: phf::Set<i32> = {};", builder.build()).unwrap();
}
