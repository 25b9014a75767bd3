/// Anything that occupies a position in 3-dimensional space.
pub trait PointObject {
    fn position(&self) -> [f64; 3];
}

impl PointObject for [f64; 3] {
    fn position(&self) -> [f64; 3] {
        *self
    }
}

impl PointObject for (f64, f64, f64) {
    fn position(&self) -> [f64; 3] {
        [self.0, self.1, self.2]
    }
}

impl<T> PointObject for &T
where
    T: PointObject + ?Sized,
{
    fn position(&self) -> [f64; 3] {
        (**self).position()
    }
}

#[cfg(test)]
mod tests {
    use super::PointObject;

    #[test]
    fn tuples_and_references_report_their_coordinates() {
        let tuple = (1.0, -2.0, 3.5);
        assert_eq!(tuple.position(), [1.0, -2.0, 3.5]);

        let array = [4.0, 5.0, 6.0];
        let by_ref = &array;
        assert_eq!(by_ref.position(), [4.0, 5.0, 6.0]);
    }
}
