use std::time::Duration;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Whole milliseconds for a browser timeout, rounded up so the deadline has passed when it fires.
pub(crate) fn timeout_millis(delay: Duration) -> u32 {
    delay
        .as_micros()
        .div_ceil(1000)
        .try_into()
        .unwrap_or(u32::MAX)
}

pub(crate) fn format_for_counter(num: u32) -> String {
    match num {
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_rounds_up_to_whole_millis() {
        assert_eq!(timeout_millis(Duration::ZERO), 0);
        assert_eq!(timeout_millis(Duration::from_micros(999_600)), 1000);
        assert_eq!(timeout_millis(Duration::from_millis(500)), 500);
        assert_eq!(timeout_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn counter_is_three_digits() {
        assert_eq!(format_for_counter(0), "000");
        assert_eq!(format_for_counter(42), "042");
        assert_eq!(format_for_counter(12_345), "999");
    }
}
