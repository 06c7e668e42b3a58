use cdma_tool::{
    assemble, from_bin, get_bits, get_bytes, get_correlation, get_str, mix, receive_all, to_bin,
    to_bits, to_bytes, to_chips, ByteOutcome, GaussianNoise, NoiseSource, Receiver, Sample,
    Session, Signal, SoftBit, SpreadingCode, Transmitter, DEFAULT_THRESHOLD,
};

const U1: SpreadingCode = SpreadingCode::new(0b0110_1110);
const U2: SpreadingCode = SpreadingCode::new(0b1010_1101);
const U3: SpreadingCode = SpreadingCode::new(0b1101_0001);

fn decode(composite: &[Sample], code: SpreadingCode, threshold: Sample) -> String {
    get_str(get_bytes(
        get_bits(get_correlation(composite.iter().copied(), code)),
        threshold,
    ))
}

fn reference_composite() -> Signal {
    let u1: Vec<i32> = to_chips(to_bits(to_bytes("Zenith   ")), U1).collect();
    let u2: Vec<i32> = to_chips(to_bits(to_bytes("Aerospace")), U2).collect();
    let u3: Vec<i32> = to_chips(to_bits(to_bytes("UUUUUUUUU")), U3).collect();
    Signal::superpose([u1, u2, u3]).unwrap()
}

#[test]
fn noiseless_single_user_round_trip_for_every_code() {
    let text = "The quick brown fox";
    for value in 1..=u8::MAX {
        let code = SpreadingCode::new(value);
        let chips: Vec<Sample> = to_chips(to_bits(to_bytes(text)), code)
            .map(Sample::from)
            .collect();
        let threshold = code.noiseless_confidence() - 1.0;
        assert_eq!(decode(&chips, code, threshold), text, "code {}", code);
    }
}

#[test]
fn full_weight_code_has_confidence_512() {
    let code = SpreadingCode::new(0xFF);
    let chips = to_chips(to_bits(to_bytes("xyz")), code);
    let outcomes: Vec<ByteOutcome> =
        assemble(get_bits(get_correlation(chips, code)), DEFAULT_THRESHOLD).collect();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.confidence() == 512.0));
    assert!(outcomes.iter().all(|o| !o.is_dropped()));
}

#[test]
fn single_bit_code_is_dropped_at_default_threshold() {
    // weight 1: each byte has confidence 8, not above 10
    let code = SpreadingCode::new(0b0001_0000);
    let chips = to_chips(to_bits(to_bytes("drop")), code);
    let outcomes: Vec<ByteOutcome> =
        assemble(get_bits(get_correlation(chips, code)), DEFAULT_THRESHOLD).collect();
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(ByteOutcome::is_dropped));
    // the bits themselves were still right
    let raw: Vec<u8> = outcomes.iter().map(ByteOutcome::raw_byte).collect();
    assert_eq!(raw, b"drop".to_vec());
}

#[test]
fn multi_user_separation() {
    let composite = reference_composite();
    assert_eq!(decode(&composite, U1, DEFAULT_THRESHOLD), "Zenith   ");
    assert_eq!(decode(&composite, U2, DEFAULT_THRESHOLD), "Aerospace");
    assert_eq!(decode(&composite, U3, DEFAULT_THRESHOLD), "UUUUUUUUU");
}

#[test]
fn multi_user_separation_with_low_noise() {
    let composite = reference_composite();
    let noise = GaussianNoise::new_from_seed(0.0, 0.05, 42)
        .unwrap()
        .generate(composite.len());
    let noisy = composite.add_noise(&noise).unwrap();

    assert_eq!(decode(&noisy, U1, DEFAULT_THRESHOLD), "Zenith   ");
    assert_eq!(decode(&noisy, U2, DEFAULT_THRESHOLD), "Aerospace");
    assert_eq!(decode(&noisy, U3, DEFAULT_THRESHOLD), "UUUUUUUUU");
}

#[test]
fn reference_noise_level_never_lengthens_output() {
    let composite = reference_composite();
    let noise = GaussianNoise::new_from_seed(0.0, 0.3, 7)
        .unwrap()
        .generate(composite.len());
    let noisy = composite.add_noise(&noise).unwrap();

    for code in [U1, U2, U3] {
        let reception = Receiver::new(code).receive(&noisy);
        assert_eq!(reception.outcomes.len(), 9);
        assert!(reception.bytes.len() <= 9);
        assert_eq!(reception.bytes.len() + reception.dropped(), 9);
    }
}

#[test]
fn threshold_monotonicity() {
    let composite = reference_composite();
    let noise = GaussianNoise::new_from_seed(0.0, 1.5, 99)
        .unwrap()
        .generate(composite.len());
    let noisy = composite.add_noise(&noise).unwrap();

    for code in [U1, U2, U3] {
        let mut previous = usize::MAX;
        for threshold in [-1.0, 0.0, 10.0, 50.0, 100.0, 150.0, 200.0, 300.0, 400.0, 1e6] {
            let emitted = get_bytes(get_bits(get_correlation(noisy.iter(), code)), threshold).count();
            assert!(
                emitted <= previous,
                "threshold {} emitted {} > {}",
                threshold,
                emitted,
                previous
            );
            previous = emitted;
        }
        assert_eq!(previous, 0);
    }
}

#[test]
fn partial_trailing_windows_are_dropped() {
    let code = U2;
    let mut chips: Vec<i32> = to_chips(to_bits(to_bytes("ok")), code).collect();
    chips.extend([1, -1, 1]);
    assert_eq!(get_correlation(chips.iter().copied(), code).count(), 16);

    // 21 soft bits: two full bytes and five stragglers
    let mut soft: Vec<SoftBit> = get_bits(get_correlation(chips, code)).collect();
    let stragglers = soft[..5].to_vec();
    soft.extend(stragglers);
    let bytes: Vec<u8> = get_bytes(soft, DEFAULT_THRESHOLD).collect();
    assert_eq!(bytes, b"ok".to_vec());
}

#[test]
fn bit_conversion_is_invertible() {
    for byte in 0..=u8::MAX {
        assert_eq!(from_bin(&to_bin(byte)), byte);
    }
}

#[test]
fn superposition_commutes_and_associates() {
    let a: Vec<i32> = to_chips(to_bits(to_bytes("abc")), U1).collect();
    let b: Vec<i32> = to_chips(to_bits(to_bytes("def")), U2).collect();
    let c: Vec<i32> = to_chips(to_bits(to_bytes("ghi")), U3).collect();

    let ab = Signal::superpose([a.clone(), b.clone()]).unwrap();
    let ba = Signal::superpose([b.clone(), a.clone()]).unwrap();
    assert_eq!(ab, ba);

    let bc = Signal::superpose([b, c.clone()]).unwrap();
    let c_real: Vec<Sample> = c.iter().map(|&x| Sample::from(x)).collect();
    let a_real: Vec<Sample> = a.iter().map(|&x| Sample::from(x)).collect();
    let left = Signal::superpose([ab.samples().to_vec(), c_real]).unwrap();
    let right = Signal::superpose([a_real, bc.samples().to_vec()]).unwrap();
    assert_eq!(left, right);
}

#[test]
fn real_valued_superposition_commutes() {
    let mut rng = GaussianNoise::new_from_seed(0.0, 1.0, 5).unwrap();
    let x = rng.generate(64);
    let y = rng.generate(64);
    let z = rng.generate(64);

    let xy: Vec<Sample> = mix([x.clone(), y.clone()]).collect::<Result<_, _>>().unwrap();
    let yx: Vec<Sample> = mix([y.clone(), x.clone()]).collect::<Result<_, _>>().unwrap();
    assert_eq!(xy, yx);

    let left: Vec<Sample> = mix([xy, z.clone()]).collect::<Result<_, _>>().unwrap();
    let yz: Vec<Sample> = mix([y, z]).collect::<Result<_, _>>().unwrap();
    let right: Vec<Sample> = mix([x, yz]).collect::<Result<_, _>>().unwrap();
    for (l, r) in left.iter().zip(&right) {
        assert!((l - r).abs() < 1e-12);
    }
}

#[test]
fn mismatched_users_fail_fast() {
    let a: Vec<i32> = to_chips(to_bits(to_bytes("four")), U1).collect();
    let b: Vec<i32> = to_chips(to_bits(to_bytes("five!")), U2).collect();
    let err = Signal::superpose([a, b]).unwrap_err();
    assert!(err.is_length_mismatch());
}

#[test]
fn parallel_receivers_match_sequential() {
    let session = Session::new()
        .user("Zenith   ", U1)
        .user("Aerospace", U2)
        .user("UUUUUUUUU", U3);
    let composite = session.transmit().unwrap();
    let noise = GaussianNoise::new_from_seed(0.0, 0.8, 3)
        .unwrap()
        .generate(composite.len());
    let noisy = composite.add_noise(&noise).unwrap();

    let receivers = session.receivers(DEFAULT_THRESHOLD);
    let parallel = receive_all(&noisy, &receivers);
    for (receiver, got) in receivers.iter().zip(&parallel) {
        let sequential = receiver.receive(&noisy);
        assert_eq!(sequential.text, got.text);
        assert_eq!(sequential.outcomes, got.outcomes);
    }
}

#[test]
fn transmitter_matches_free_functions() {
    let chips = Transmitter::new(U3).transmit("UUUU").unwrap();
    let expected: Vec<i32> = to_chips(to_bits(to_bytes("UUUU")), U3).collect();
    assert_eq!(chips, expected);
}
