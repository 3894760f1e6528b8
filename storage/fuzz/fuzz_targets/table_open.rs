#![no_main]

use arbitrary::Arbitrary;
use bintable_codec::{CellReader, CellWriter, Cells, Columnar, Error, Opaque, Schema};
use bintable_storage::{
    stream::memory::Memory,
    table::{Config, Kind, Table},
};
use libfuzzer_sys::fuzz_target;

struct Entry {
    id: u32,
    value: u64,
}

impl Cells for Entry {
    fn write_cells(&self, cells: &mut CellWriter<'_>) -> Result<(), Error> {
        cells.put(&self.id)?;
        cells.put(&self.value)
    }

    fn read_cells(cells: &mut CellReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            id: cells.get()?,
            value: cells.get()?,
        })
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    columnar: bool,
    content: Vec<u8>,
    index: u64,
}

fn fuzz(input: FuzzInput) {
    // Arbitrary bytes must never cause a panic, only errors.
    let mut stream = Memory::from(input.content.clone());
    let kind = if input.columnar {
        Kind::Columnar
    } else {
        Kind::Opaque
    };
    let _ = Table::<Memory, Opaque<u64>>::inspect(&mut stream, kind);

    if input.columnar {
        let schema = Schema::builder()
            .column("id", 4)
            .unwrap()
            .column("value", 8)
            .unwrap()
            .build()
            .unwrap();
        let cfg = Config::new(Columnar::<Entry>::new(schema));
        if let Ok(mut table) = Table::init(stream, cfg) {
            let _ = table.read_row(input.index);
            let _ = table.append_row(&Entry {
                id: input.index as u32,
                value: input.index,
            });
            let _ = table.last_row();
        }
    } else {
        let cfg = Config::new(Opaque::<u64>::new());
        if let Ok(mut table) = Table::init(stream, cfg) {
            let _ = table.read_row(input.index);
            let _ = table.append_row(&input.index);
            let _ = table.last_row();
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
