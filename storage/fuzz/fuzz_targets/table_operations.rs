#![no_main]

use arbitrary::Arbitrary;
use bintable_codec::Opaque;
use bintable_storage::{
    stream::memory::Memory,
    table::{Config, Error, Table},
};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug, Clone)]
enum TableOperation {
    Append { row: String },
    Write { index: u64, row: String },
    Read { index: u64 },
    First,
    Last,
    Iterate,
    Reopen,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    operations: Vec<TableOperation>,
}

fn fuzz(input: FuzzInput) {
    let cfg = Config::new(Opaque::<String>::new());
    let mut table = Table::init(Memory::new(), cfg.clone()).unwrap();

    // Every row ever stored, padded or not, must read back as written.
    let mut expected: Vec<String> = Vec::new();
    let mut width: Option<usize> = None;

    for op in input.operations.iter() {
        match op {
            TableOperation::Append { row } => {
                let encoded = row.len() + varint_size(row.len());
                match table.append_row(row) {
                    Ok(index) => {
                        assert_eq!(index, expected.len() as u64);
                        let committed = *width.get_or_insert(encoded);
                        assert!(encoded <= committed);
                        expected.push(row.clone());
                    }
                    Err(Error::RowTooWide(found, _)) => assert_eq!(found, encoded),
                    Err(err) => panic!("unexpected append error: {err}"),
                }
            }

            TableOperation::Write { index, row } => match table.write_row(*index, row) {
                Ok(()) => expected[*index as usize] = row.clone(),
                Err(Error::NotInitialized) => assert!(width.is_none()),
                Err(Error::RowTooWide(..)) => {}
                Err(Error::OutOfRange(found, count)) => {
                    assert_eq!(found, *index);
                    assert_eq!(count, expected.len() as u64);
                }
                Err(err) => panic!("unexpected write error: {err}"),
            },

            TableOperation::Read { index } => match table.read_row(*index) {
                Ok(row) => assert_eq!(row, expected[*index as usize]),
                Err(Error::NotInitialized) => assert!(width.is_none()),
                Err(Error::EmptyTable) => assert!(expected.is_empty()),
                Err(Error::OutOfRange(..)) => assert!(*index >= expected.len() as u64),
                Err(err) => panic!("unexpected read error: {err}"),
            },

            TableOperation::First => match table.first_row() {
                Ok(row) => assert_eq!(Some(&row), expected.first()),
                Err(Error::EmptyTable) => assert!(expected.is_empty()),
                Err(err) => panic!("unexpected first row error: {err}"),
            },

            TableOperation::Last => match table.last_row() {
                Ok(row) => assert_eq!(Some(&row), expected.last()),
                Err(Error::EmptyTable) => assert!(expected.is_empty()),
                Err(err) => panic!("unexpected last row error: {err}"),
            },

            TableOperation::Iterate => {
                let rows: Vec<_> = table
                    .rows()
                    .unwrap()
                    .map(|row| row.unwrap().1)
                    .collect();
                assert_eq!(rows, expected);
            }

            TableOperation::Reopen => {
                let stream = table.close().unwrap();
                table = Table::init(stream, cfg.clone()).unwrap();
                assert_eq!(table.row_width().map(|w| w as usize), width);
            }
        }
        assert_eq!(table.row_count().unwrap(), expected.len() as u64);
    }
}

fn varint_size(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    (bits.max(1) as usize).div_ceil(7)
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
