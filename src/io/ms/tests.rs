// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use marlu::rubbl_casatables::{TableCreateMode, TableDesc, TableDescCreateMode};
use tempfile::{tempdir, TempDir};

use super::*;
use crate::tests::*;

fn new_table(path: &Path, desc: TableDesc, n_rows: usize) -> Table {
    Table::new(path, desc, n_rows, TableCreateMode::New).unwrap()
}

/// Write the test metadata and visibilities into a new measurement set. Only
/// the columns that are read are created.
fn write_test_ms() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let ms = dir.path().join("test.ms");
    let metadata = array_metadata();
    let vis = vis_data();

    let mut desc = TableDesc::new("", TableDescCreateMode::TDM_SCRATCH).unwrap();
    desc.add_scalar_column(GlueDataType::TpDouble, "TIME", None, false, false)
        .unwrap();
    desc.add_scalar_column(GlueDataType::TpInt, "ANTENNA1", None, false, false)
        .unwrap();
    desc.add_scalar_column(GlueDataType::TpInt, "ANTENNA2", None, false, false)
        .unwrap();
    desc.add_array_column(GlueDataType::TpDouble, "UVW", None, Some(&[3]), false, false)
        .unwrap();
    desc.add_array_column(
        GlueDataType::TpComplex,
        "DATA",
        None,
        Some(&[NUM_CHANS as u64, NUM_POLS as u64]),
        false,
        false,
    )
    .unwrap();
    let mut main_table = new_table(&ms, desc, vis.num_rows());
    for i_row in 0..vis.num_rows() {
        let row = i_row as u64;
        main_table.put_cell("TIME", row, &vis.times[i_row]).unwrap();
        main_table
            .put_cell("ANTENNA1", row, &vis.antenna1[i_row])
            .unwrap();
        main_table
            .put_cell("ANTENNA2", row, &vis.antenna2[i_row])
            .unwrap();
        main_table
            .put_cell("UVW", row, &vis.uvws.row(i_row).to_vec())
            .unwrap();
        main_table
            .put_cell("DATA", row, &vis.data.slice(s![i_row, .., ..]).to_owned())
            .unwrap();
    }
    drop(main_table);

    let mut desc = TableDesc::new("", TableDescCreateMode::TDM_SCRATCH).unwrap();
    desc.add_scalar_column(GlueDataType::TpString, "NAME", None, false, false)
        .unwrap();
    desc.add_array_column(
        GlueDataType::TpDouble,
        "POSITION",
        None,
        Some(&[3]),
        false,
        false,
    )
    .unwrap();
    let mut antenna_table = new_table(&ms.join("ANTENNA"), desc, NUM_TILES);
    for (i_row, (name, pos)) in metadata
        .tile_names
        .iter()
        .zip(metadata.tile_positions.iter())
        .enumerate()
    {
        antenna_table
            .put_cell("NAME", i_row as u64, name)
            .unwrap();
        antenna_table
            .put_cell("POSITION", i_row as u64, &vec![pos.x, pos.y, pos.z])
            .unwrap();
    }
    drop(antenna_table);

    let mut desc = TableDesc::new("", TableDescCreateMode::TDM_SCRATCH).unwrap();
    desc.add_array_column(
        GlueDataType::TpDouble,
        "CHAN_FREQ",
        None,
        Some(&[NUM_CHANS as u64]),
        false,
        false,
    )
    .unwrap();
    let mut spw_table = new_table(&ms.join("SPECTRAL_WINDOW"), desc, 1);
    spw_table
        .put_cell("CHAN_FREQ", 0, &metadata.freqs_hz.to_vec())
        .unwrap();
    drop(spw_table);

    let mut desc = TableDesc::new("", TableDescCreateMode::TDM_SCRATCH).unwrap();
    desc.add_array_column(
        GlueDataType::TpDouble,
        "PHASE_DIR",
        None,
        Some(&[1, 2]),
        false,
        false,
    )
    .unwrap();
    let mut field_table = new_table(&ms.join("FIELD"), desc, 1);
    let phase_dir = array![[metadata.phase_centre.ra, metadata.phase_centre.dec]];
    field_table.put_cell("PHASE_DIR", 0, &phase_dir).unwrap();
    drop(field_table);

    (dir, ms)
}

fn read_column_uvws(ms: &Path, column: &str) -> Array2<f64> {
    let mut table = Table::open(ms, TableOpenMode::Read).unwrap();
    let num_rows = table.n_rows() as usize;
    let mut uvws = Array2::zeros((num_rows, 3));
    for (i_row, mut uvw) in uvws.outer_iter_mut().enumerate() {
        let cell: Vec<f64> = table.get_cell_as_vec(column, i_row as u64).unwrap();
        uvw.assign(&ArrayView1::from(&cell));
    }
    uvws
}

#[test]
fn test_read_metadata() {
    let (_dir, ms) = write_test_ms();
    let mut table = MsTable::new(&ms, None, None).unwrap();
    let metadata = table.read_metadata().unwrap();
    let expected = array_metadata();

    assert_eq!(metadata.tile_names, expected.tile_names);
    for (pos, exp) in metadata
        .tile_positions
        .iter()
        .zip(expected.tile_positions.iter())
    {
        assert_abs_diff_eq!(pos, exp, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(
        metadata.freqs_hz.as_slice(),
        expected.freqs_hz.as_slice(),
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        metadata.phase_centre.ra,
        expected.phase_centre.ra,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        metadata.phase_centre.dec,
        expected.phase_centre.dec,
        epsilon = 1e-12
    );
}

#[test]
fn test_read_vis() {
    let (_dir, ms) = write_test_ms();
    let mut table = MsTable::new(&ms, None, None).unwrap();
    let vis = table.read_vis().unwrap();
    let expected = vis_data();

    assert_eq!(vis.times, expected.times);
    assert_eq!(vis.antenna1, expected.antenna1);
    assert_eq!(vis.antenna2, expected.antenna2);
    assert_abs_diff_eq!(vis.uvws, expected.uvws, epsilon = 1e-12);
    assert_eq!(vis.data, expected.data);
}

#[test]
fn test_new_errors() {
    let dir = tempdir().unwrap();
    let result = MsTable::new(dir.path().join("missing.ms"), None, None);
    assert!(matches!(result, Err(VisTableError::BadFile(_))));

    let (_dir, ms) = write_test_ms();
    let result = MsTable::new(&ms, Some("MODEL_DATA".to_string()), None);
    match result {
        Err(VisTableError::NoDataCol { col }) => assert_eq!(col, "MODEL_DATA"),
        Err(e) => panic!("Unexpected error: {e}"),
        Ok(_) => panic!("A missing data column was accepted"),
    }
}

#[test]
fn test_write_corrected_keeps_first_far_field_uvws() {
    let (_dir, ms) = write_test_ms();
    let original = vis_data();
    let mut table = MsTable::new(&ms, None, None).unwrap();

    // First pass: only the first two rows are "corrected".
    let mut first = table.read_vis().unwrap();
    first.uvws.mapv_inplace(|x| x + 100.0);
    first.data.mapv_inplace(|v| v * 2.0);
    let far_field = original.uvws.clone();
    table
        .write_corrected(&first, far_field.view(), &[0, 1])
        .unwrap();

    let uvw_far_field = read_column_uvws(&ms, FAR_FIELD_UVW_COLUMN);
    assert_abs_diff_eq!(uvw_far_field, original.uvws, epsilon = 1e-12);
    let uvw = read_column_uvws(&ms, UVW_COLUMN);
    assert_abs_diff_eq!(uvw.slice(s![..2, ..]), first.uvws.slice(s![..2, ..]), epsilon = 1e-12);
    assert_abs_diff_eq!(
        uvw.slice(s![2.., ..]),
        original.uvws.slice(s![2.., ..]),
        epsilon = 1e-12
    );

    // The input column is untouched and the output column has the new data.
    let mut main_table = Table::open(&ms, TableOpenMode::Read).unwrap();
    for i_row in 0..original.num_rows() {
        let data: Array2<c32> = main_table.get_cell("DATA", i_row as u64).unwrap();
        assert_eq!(data, original.data.slice(s![i_row, .., ..]));
        let corrected: Array2<c32> = main_table
            .get_cell(DEFAULT_OUTPUT_DATA_COLUMN, i_row as u64)
            .unwrap();
        assert_eq!(corrected, first.data.slice(s![i_row, .., ..]));
    }
    drop(main_table);

    // A rerun reads the saved far-field UVWs rather than the modified UVWs.
    let mut second = table.read_vis().unwrap();
    assert_abs_diff_eq!(second.uvws, original.uvws, epsilon = 1e-12);

    // Second pass with different UVWs, including a different "far-field"
    // snapshot; the saved snapshot must not change.
    second.uvws.mapv_inplace(|x| x - 50.0);
    let other_far_field = second.uvws.clone();
    table
        .write_corrected(&second, other_far_field.view(), &[1, 2])
        .unwrap();

    let uvw_far_field = read_column_uvws(&ms, FAR_FIELD_UVW_COLUMN);
    assert_abs_diff_eq!(uvw_far_field, original.uvws, epsilon = 1e-12);
    let uvw = read_column_uvws(&ms, UVW_COLUMN);
    assert_abs_diff_eq!(uvw.row(0), first.uvws.row(0), epsilon = 1e-12);
    assert_abs_diff_eq!(uvw.slice(s![1..3, ..]), second.uvws.slice(s![1..3, ..]), epsilon = 1e-12);
    assert_abs_diff_eq!(
        uvw.slice(s![3.., ..]),
        original.uvws.slice(s![3.., ..]),
        epsilon = 1e-12
    );
}

#[test]
fn test_write_custom_output_column() {
    let (_dir, ms) = write_test_ms();
    let mut table = MsTable::new(&ms, None, Some("NEAR_FIELD_DATA".to_string())).unwrap();
    let vis = table.read_vis().unwrap();
    table.write_corrected(&vis, vis.uvws.view(), &[]).unwrap();

    let mut main_table = Table::open(&ms, TableOpenMode::Read).unwrap();
    let col_names = main_table.column_names().unwrap();
    assert!(col_names.iter().any(|c| c == "NEAR_FIELD_DATA"));
    assert!(!col_names.iter().any(|c| c == DEFAULT_OUTPUT_DATA_COLUMN));
    let written: Array2<c32> = main_table.get_cell("NEAR_FIELD_DATA", 3).unwrap();
    assert_eq!(written, vis.data.slice(s![3, .., ..]));
}
