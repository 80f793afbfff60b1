//! Interpolation of sounding values between reported levels.
use crate::{
    error::{Error, Result},
    sounding::{DataRow, Sounding},
};
use itertools::{izip, Itertools};
use metfor::{HectoPascal, Knots, Meters, Quantity, WindSpdDir, WindUV};
use optional::Optioned;
use std::ops::Sub;

/// Interpolate values from the vertical sounding using pressure as the primary coordinate.
///
/// Returns a `DataRow` struct with interpolated values.
pub fn linear_interpolate_sounding(snd: &Sounding, tgt_p: HectoPascal) -> Result<DataRow> {
    let pressure: &[Optioned<HectoPascal>] = snd.pressure_profile();

    enum BracketType {
        Bracket(usize, usize),
        EndEquals(usize),
    }

    let make_bracket = |pnt_0, pnt_1| -> Option<BracketType> {
        let (i0, p0): (_, HectoPascal) = pnt_0;
        let (i1, p1): (_, HectoPascal) = pnt_1;

        if (p0 - tgt_p).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEquals(i0))
        } else if (p1 - tgt_p).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEquals(i1))
        } else if p0 > tgt_p && p1 < tgt_p {
            Some(BracketType::Bracket(i0, i1))
        } else {
            None
        }
    };

    pressure
        .iter()
        .enumerate()
        .filter_map(|(i, p_val_opt)| p_val_opt.map(|p_val| (i, p_val)))
        .tuple_windows::<(_, _)>()
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        .next()
        .and_then(|bracket| match bracket {
            BracketType::Bracket(i0, i1) => {
                let row0 = snd.data_row(i0)?;
                let row1 = snd.data_row(i1)?;
                linear_interp_data_rows(row0, row1, tgt_p)
            }
            BracketType::EndEquals(i) => snd.data_row(i),
        })
        .ok_or(Error::InterpolationError)
}

/// Interpolate the sounding at a geopotential height (above sea level).
///
/// The pressure at the target height is found first, then all the other values are interpolated
/// in pressure.
pub fn linear_interpolate_sounding_at_height(snd: &Sounding, tgt_h: Meters) -> Result<DataRow> {
    let p = linear_interpolate(snd.height_profile(), snd.pressure_profile(), tgt_h)
        .into_option()
        .ok_or(Error::InterpolationError)?;

    linear_interpolate_sounding(snd, p).map(|mut row| {
        row.height = Optioned::from(tgt_h);
        row
    })
}

/// Interpolate values given two parallel vectors of data and a target value.
///
/// Assumes that xs is monotonic.
#[inline]
pub fn linear_interpolate<X, Y>(xs: &[Optioned<X>], ys: &[Optioned<Y>], target_x: X) -> Optioned<Y>
where
    X: Quantity + optional::Noned + PartialOrd + Sub<X>,
    <X as Sub<X>>::Output: Quantity + optional::Noned,
    Y: Quantity + optional::Noned + Sub<Y>,
    <Y as Sub<Y>>::Output: Quantity,
{
    debug_assert_eq!(xs.len(), ys.len());

    enum BracketType<X, Y> {
        Bracket((X, Y), (X, Y)),
        EndEqual((X, Y)),
    }

    let make_bracket = |pnt_0, pnt_1| -> Option<BracketType<X, Y>> {
        let (x0, _): (X, Y) = pnt_0;
        let (x1, _): (X, Y) = pnt_1;

        if (x0 - target_x).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - target_x).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else if (x0 < target_x && x1 > target_x) || (x0 > target_x && x1 < target_x) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else {
            None
        }
    };

    let value_opt = izip!(xs, ys)
        // Skip levels with a missing value and bracket with the points on either side.
        .filter(|(x, y)| x.is_some() && y.is_some())
        .map(|(x, y)| (x.unpack(), y.unpack()))
        .tuple_windows::<(_, _)>()
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        .next()
        .map(|val| match val {
            BracketType::Bracket(pnt_0, pnt_1) => {
                let (x0, y0) = pnt_0;
                let (x1, y1) = pnt_1;
                linear_interp(target_x, x0, x1, y0, y1)
            }
            BracketType::EndEqual(pnt) => pnt.1,
        });

    Optioned::from(value_opt)
}

#[inline]
pub(crate) fn linear_interp<X, Y>(x_val: X, x1: X, x2: X, y1: Y, y2: Y) -> Y
where
    X: Sub<X> + Copy + std::fmt::Debug + std::cmp::PartialEq,
    <X as Sub<X>>::Output: Quantity,
    Y: Quantity + Sub<Y>,
    <Y as Sub<Y>>::Output: Quantity,
{
    debug_assert_ne!(x1, x2);

    let run = (x2 - x1).unpack();
    let rise = (y2 - y1).unpack();
    let dx = (x_val - x1).unpack();

    Y::pack(y1.unpack() + dx * (rise / run))
}

#[inline]
fn linear_interp_data_rows(row0: DataRow, row1: DataRow, tgt_p: HectoPascal) -> Option<DataRow> {
    let p0 = row0.pressure.into_option()?;
    let p1 = row1.pressure.into_option()?;

    let run = p1 - p0;
    let dp = tgt_p - p0;

    let mut result = DataRow {
        pressure: Optioned::from(tgt_p),
        ..DataRow::default()
    };

    result.temperature = eval_linear_interp(row0.temperature, row1.temperature, run, dp);
    result.dew_point = eval_linear_interp(row0.dew_point, row1.dew_point, run, dp);
    result.height = eval_linear_interp(row0.height, row1.height, run, dp);

    // Winds are interpolated by component.
    if let (Some(w_below), Some(w_above)) = (row0.wind.into_option(), row1.wind.into_option()) {
        let WindUV::<Knots> {
            u: x_below,
            v: y_below,
        } = WindUV::from(w_below);
        let WindUV::<Knots> {
            u: x_above,
            v: y_above,
        } = WindUV::from(w_above);
        let frac = dp.unpack() / run.unpack();

        let x = x_below + (x_above - x_below) * frac;
        let y = y_below + (y_above - y_below) * frac;

        result.wind = WindSpdDir::from(WindUV { u: x, v: y }).into();
    }

    Some(result)
}

#[inline]
fn eval_linear_interp<QX, Y>(
    low_val: Optioned<Y>,
    high_val: Optioned<Y>,
    run: QX,
    dp: QX,
) -> Optioned<Y>
where
    QX: Quantity + optional::Noned,
    Y: Quantity + optional::Noned,
{
    if low_val.is_some() && high_val.is_some() {
        let (val_below, val_above) = (low_val.unpack().unpack(), high_val.unpack().unpack());
        let rise: f64 = val_above - val_below;
        Optioned::from(Y::pack(val_below + dp.unpack() * rise / run.unpack()))
    } else {
        Optioned::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sounding::doctest::make_test_sounding;
    use metfor::Celsius;
    use optional::some;

    #[test]
    fn test_linear_interpolate() {
        let xs: Vec<Optioned<HectoPascal>> = vec![1000.0, 900.0, 800.0]
            .into_iter()
            .map(HectoPascal)
            .map(some)
            .collect();
        let ys: Vec<Optioned<Celsius>> =
            vec![some(Celsius(20.0)), Optioned::default(), some(Celsius(10.0))];

        let val = linear_interpolate(&xs, &ys, HectoPascal(900.0)).unwrap();
        assert!((val.unpack() - 15.0).abs() < 1.0e-9);

        let val = linear_interpolate(&xs, &ys, HectoPascal(1000.0)).unwrap();
        assert!((val.unpack() - 20.0).abs() < 1.0e-9);

        assert!(linear_interpolate(&xs, &ys, HectoPascal(700.0)).is_none());
    }

    #[test]
    fn test_interpolate_sounding() {
        let snd = make_test_sounding();

        let row = linear_interpolate_sounding(&snd, HectoPascal(975.0)).unwrap();
        assert_eq!(row.pressure.unwrap(), HectoPascal(975.0));
        assert!((row.temperature.unwrap().unpack() - 28.0).abs() < 1.0e-9);
        assert!((row.height.unwrap().unpack() - 335.0).abs() < 1.0e-9);
        assert!(row.wind.is_some());

        let row = linear_interpolate_sounding(&snd, HectoPascal(850.0)).unwrap();
        assert_eq!(row.height.unwrap(), Meters(1520.0));

        assert!(linear_interpolate_sounding(&snd, HectoPascal(1050.0)).is_err());
    }

    #[test]
    fn test_interpolate_at_height() {
        let snd = make_test_sounding();

        let row = linear_interpolate_sounding_at_height(&snd, Meters(1520.0)).unwrap();
        assert!((row.pressure.unwrap().unpack() - 850.0).abs() < 1.0e-9);
        assert!(linear_interpolate_sounding_at_height(&snd, Meters(50_000.0)).is_err());
    }
}
