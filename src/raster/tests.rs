use super::*;
use crate::Sample;

/// `num_rasters` rasters of `num_rows` rows with `row_len` pointings each.
/// Rows sweep along RA in 0.1 steps, 1 s apart; consecutive rows are 10 s and
/// `dec_step` apart in Dec. Returns (positions, times).
fn raster(
    num_rasters: usize,
    num_rows: usize,
    row_len: usize,
    dec_step: f64,
    boustrophedon: bool,
) -> (Array2<f64>, Vec<f64>) {
    let n = num_rasters * num_rows * row_len;
    let mut positions = Array2::zeros((n, 2));
    let mut times = Vec::with_capacity(n);
    let mut i = 0;
    let mut t = 0.0;
    for _ in 0..num_rasters {
        for row in 0..num_rows {
            for k in 0..row_len {
                let k = if boustrophedon && row % 2 == 1 {
                    row_len - 1 - k
                } else {
                    k
                };
                positions[[i, 0]] = k as f64 * 0.1;
                positions[[i, 1]] = row as f64 * dec_step;
                times.push(t);
                t += 1.0;
                i += 1;
            }
            t += 9.0;
        }
    }
    (positions, times)
}

#[test]
fn test_unidirectional_raster() {
    let (positions, times) = raster(2, 3, 5, 0.1, false);
    let (row_gaps, raster_gaps) =
        detect_raster_gaps(positions.view(), &times, &RasterGapOptions::default()).unwrap();
    assert_eq!(row_gaps, vec![5, 10, 15, 20, 25]);
    assert_eq!(raster_gaps, vec![15]);
}

#[test]
fn test_boustrophedon_raster() {
    let (positions, times) = raster(3, 4, 6, 0.05, true);
    let (row_gaps, raster_gaps) =
        detect_raster_gaps(positions.view(), &times, &RasterGapOptions::default()).unwrap();
    assert_eq!(row_gaps.len(), 11);
    assert_eq!(raster_gaps, vec![24, 48]);
    assert!(raster_gaps.iter().all(|g| row_gaps.contains(g)));
}

#[test]
fn test_sign_follows_scan_direction() {
    // Rows stepping towards negative Dec need the opposite sign.
    let (positions, times) = raster(2, 3, 5, -0.1, false);
    let options = RasterGapOptions {
        sign: 1.0,
        ..Default::default()
    };
    let (_, raster_gaps) = detect_raster_gaps(positions.view(), &times, &options).unwrap();
    assert_eq!(raster_gaps, vec![15]);
}

#[test]
fn test_ddm_override() {
    let (positions, times) = raster(2, 3, 5, 0.1, false);
    // Every row boundary projects to 0.01 or -0.02; a huge threshold flags
    // them all.
    let options = RasterGapOptions {
        ddm: Some(1.0),
        ..Default::default()
    };
    let (row_gaps, raster_gaps) = detect_raster_gaps(positions.view(), &times, &options).unwrap();
    assert_eq!(raster_gaps, row_gaps);
}

#[test]
fn test_single_row_and_degenerate() {
    let (positions, times) = raster(1, 1, 5, 0.1, false);
    let (row_gaps, raster_gaps) =
        detect_raster_gaps(positions.view(), &times, &RasterGapOptions::default()).unwrap();
    assert!(row_gaps.is_empty());
    assert!(raster_gaps.is_empty());

    let positions = Array2::<f64>::zeros((0, 2));
    let (row_gaps, raster_gaps) =
        detect_raster_gaps(positions.view(), &[], &RasterGapOptions::default()).unwrap();
    assert!(row_gaps.is_empty() && raster_gaps.is_empty());

    let positions = Array2::<f64>::zeros((1, 2));
    let (row_gaps, raster_gaps) =
        detect_raster_gaps(positions.view(), &[3.0], &RasterGapOptions::default()).unwrap();
    assert_eq!(row_gaps, vec![0, 1]);
    assert!(raster_gaps.is_empty());

    // A one-sample first row gives no scan direction.
    let positions = arr2(&[[0.0, 0.0], [0.0, 0.1], [0.1, 0.1], [0.2, 0.1]]);
    let times = [0.0, 10.0, 11.0, 12.0];
    let (row_gaps, raster_gaps) =
        detect_raster_gaps(positions.view(), &times, &RasterGapOptions::default()).unwrap();
    assert_eq!(row_gaps, vec![1]);
    assert!(raster_gaps.is_empty());
}

#[test]
fn test_bad_shapes() {
    let positions = Array2::<f64>::zeros((3, 3));
    assert_eq!(
        detect_raster_gaps(positions.view(), &[0.0, 1.0, 2.0], &RasterGapOptions::default())
            .unwrap_err(),
        GroupingError::BadPositionShape { rows: 3, cols: 3 }
    );
    let positions = Array2::<f64>::zeros((3, 2));
    assert!(matches!(
        detect_raster_gaps(positions.view(), &[0.0], &RasterGapOptions::default()),
        Err(GroupingError::LengthMismatch { name: "TIME", .. })
    ));
}

#[test]
fn test_raster_uses_nominal_spw_and_pol() {
    let (positions, times) = raster(2, 3, 5, 0.1, false);
    let mut samples = vec![];
    let mut id = 0;
    for (i, &time) in times.iter().enumerate() {
        // spw 3 has two pols per integration, spw 1 has one.
        for (spw, pol) in [(3, 1), (3, 0), (1, 0)] {
            samples.push(Sample {
                id,
                row: id,
                time,
                ra: positions[[i, 0]],
                dec: positions[[i, 1]],
                beam: 0,
                antenna: 0,
                spw,
                pol,
            });
            id += 1;
        }
    }
    let raster = Raster::new(SampleTable::new(samples).unwrap()).unwrap();
    assert_eq!(raster.nominal_spw, 3);
    // Both pols of spw 3 are equally common; the lower wins.
    assert_eq!(raster.nominal_pol, 0);
    assert_eq!(raster.table().len(), 90);

    let (row_gaps, raster_gaps) = raster.detect_gaps(&RasterGapOptions::default()).unwrap();
    // Sample index i maps to id 3 * i + 1 (spw 3, pol 0).
    assert_eq!(row_gaps, vec![16, 31, 46, 61, 76]);
    assert_eq!(raster_gaps, vec![46]);
}

#[test]
fn test_empty_raster() {
    assert!(Raster::new(SampleTable::default()).is_none());
}
