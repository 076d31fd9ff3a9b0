use assert_approx_eq::assert_approx_eq;
use ssml_segments::elements::*;
use ssml_segments::{
    extract_text, parse, parse_with, process, process_with, ParserConfigBuilder, Segment,
    SpeechSettings, TagMatching,
};

/// Tag kinds in document order.
fn kinds(elements: &[Element]) -> Vec<SsmlElement> {
    let mut kinds = vec![];
    for element in elements {
        if let Element::Tag(tag) = element {
            kinds.push(tag.kind.clone());
            kinds.extend(self::kinds(&tag.children));
        }
    }
    kinds
}

fn texts(segments: &[Segment]) -> Vec<&str> {
    segments.iter().map(|s| s.text.as_str()).collect()
}

/// Example SSML taken from Appendix E of the W3C SSML 1.1 recommendation which
/// can be found [here](https://www.w3.org/TR/speech-synthesis11).
///
/// "Speech Synthesis Markup Language (SSML) Version 1.1" _Copyright © 2010 W3C® (MIT, ERCIM, Keio),
/// All Rights Reserved._
#[test]
fn simple_example() {
    let ssml = r#"<?xml version="1.0"?>
        <speak version="1.1"
               xmlns="http://www.w3.org/2001/10/synthesis"
               xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
               xsi:schemaLocation="http://www.w3.org/2001/10/synthesis
                           http://www.w3.org/TR/speech-synthesis11/synthesis.xsd"
               xml:lang="en-US">
          <p>
            <s>You have 4 new messages.</s>
            <s>The first is from Stephanie Williams and arrived at <break/> 3:45pm.
            </s>
            <s>
              The subject is <prosody rate="20%">ski trip</prosody>
            </s>
          </p>
        </speak>"#;

    let result = parse(ssml);
    assert!(result.has_ssml());

    let whole_sentence = "You have 4 new messages. The first is from Stephanie Williams and arrived at 3:45pm. The subject is ski trip";
    assert_eq!(result.plain_text(), whole_sentence);

    let speak = result.elements()[0].as_tag().unwrap();
    assert_eq!(speak.kind, SsmlElement::Speak);
    assert_eq!(speak.attribute("xml:lang"), Some("en-US"));
    assert_eq!(extract_text(&speak.children), whole_sentence);

    {
        use SsmlElement::*;
        assert_eq!(
            kinds(result.elements()),
            vec![Speak, Paragraph, Sentence, Sentence, Break, Sentence, Prosody]
        );
    }

    let processed = process(&result);
    assert_eq!(
        texts(&processed.segments),
        vec![
            "You have 4 new messages.",
            "The first is from Stephanie Williams and arrived at",
            " ",
            "3:45pm.",
            "The subject is",
            "ski trip",
            " ",
        ]
    );
    assert_approx_eq!(processed.segments[2].settings.pause.unwrap(), 0.25);
    assert_approx_eq!(processed.segments[5].settings.rate.unwrap(), 0.2);
    assert_eq!(processed.segments[4].settings, SpeechSettings::new());
    assert_approx_eq!(processed.segments[6].settings.pause.unwrap(), 0.5);
}

/// Example SSML taken from Appendix E of the W3C SSML 1.1 recommendation which
/// can be found [here](https://www.w3.org/TR/speech-synthesis11).
///
/// "Speech Synthesis Markup Language (SSML) Version 1.1" _Copyright © 2010 W3C® (MIT, ERCIM, Keio),
/// All Rights Reserved._
#[test]
fn audio_example() {
    let ssml = r#"<?xml version="1.0"?>
        <speak version="1.1"
               xmlns="http://www.w3.org/2001/10/synthesis"
               xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
               xsi:schemaLocation="http://www.w3.org/2001/10/synthesis
                           http://www.w3.org/TR/speech-synthesis11/synthesis.xsd"
               xml:lang="en-US">

          <p>
            <voice gender="male">
              <s>Today we preview the latest romantic music from Example.</s>

              <s>Hear what the Software Reviews said about Example's newest hit.</s>
            </voice>
          </p>

          <p>
            <voice gender="female">
              He sings about issues that touch us all.
            </voice>
          </p>

          <p>
            <voice gender="male">
              Here's a sample.  <audio src="http://www.example.com/music.wav"/>
              Would you like to buy it?
            </voice>
          </p>

        </speak>
        "#;
    let result = parse(ssml);
    assert_eq!(result.plain_text(),
               "Today we preview the latest romantic music from Example. Hear what the Software Reviews said about Example's newest hit. He sings about issues that touch us all. Here's a sample. Would you like to buy it?");

    let processed = process(&result);
    let paragraph_breaks = processed
        .segments
        .iter()
        .filter(|s| s.is_pause() && s.settings.pause == Some(0.5))
        .count();
    assert_eq!(paragraph_breaks, 3);
}

/// Example SSML taken from Appendix E of the W3C SSML 1.1 recommendation which
/// can be found [here](https://www.w3.org/TR/speech-synthesis11).
///
/// "Speech Synthesis Markup Language (SSML) Version 1.1" _Copyright © 2010 W3C® (MIT, ERCIM, Keio),
/// All Rights Reserved._
#[test]
fn mixed_language_example() {
    let ssml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
        <speak version="1.1" xmlns="http://www.w3.org/2001/10/synthesis"
               xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
               xsi:schemaLocation="http://www.w3.org/2001/10/synthesis
                         http://www.w3.org/TR/speech-synthesis11/synthesis.xsd"
               xml:lang="en-US">

          The title of the movie is:
          "La vita è bella"
          (Life is beautiful),
          which is directed by Roberto Benigni.
        </speak>"#;
    let result = parse(ssml);
    assert_eq!(
        result.plain_text(),
        r#"The title of the movie is: "La vita è bella" (Life is beautiful), which is directed by Roberto Benigni."#
    );
}

/// Example SSML taken from Appendix E of the W3C SSML 1.1 recommendation which
/// can be found [here](https://www.w3.org/TR/speech-synthesis11).
///
/// "Speech Synthesis Markup Language (SSML) Version 1.1" _Copyright © 2010 W3C® (MIT, ERCIM, Keio),
/// All Rights Reserved._
#[test]
fn ipa_support() {
    let ssml = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
        <speak version="1.1" xmlns="http://www.w3.org/2001/10/synthesis"
               xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
               xsi:schemaLocation="http://www.w3.org/2001/10/synthesis
                         http://www.w3.org/TR/speech-synthesis11/synthesis.xsd"
               xml:lang="en-US">

          The title of the movie is:
          <phoneme alphabet="ipa"
            ph="&#x2C8;l&#x251; &#x2C8;vi&#x2D0;&#x27E;&#x259; &#x2C8;&#x294;e&#x26A; &#x2C8;b&#x25B;l&#x259;">
          La vita è bella </phoneme>
          <!-- The IPA pronunciation is ˈlɑ ˈviːɾə ˈʔeɪ ˈbɛlə -->
          (Life is beautiful),
          which is directed by
          <phoneme alphabet="ipa"
            ph="&#x279;&#x259;&#x2C8;b&#x25B;&#x2D0;&#x279;&#x27E;o&#x28A; b&#x25B;&#x2C8;ni&#x2D0;nji">
          Roberto Benigni </phoneme>
          <!-- The IPA pronunciation is ɹəˈbɛːɹɾoʊ bɛˈniːnji -->

          <!-- Note that in actual practice an author might change the
             encoding to UTF-8 and directly use the Unicode characters in
             the document rather than using the escapes as shown.
             The escaped values are shown for ease of copying. -->
        </speak>"#;
    let result = parse(ssml);
    assert_eq!(
        result.plain_text(),
        r#"The title of the movie is: La vita è bella (Life is beautiful), which is directed by Roberto Benigni"#
    );

    let speak = result.elements()[0].as_tag().unwrap();
    let phonemes = speak
        .children
        .iter()
        .filter_map(Element::as_tag)
        .filter(|t| t.kind == SsmlElement::Phoneme)
        .map(|t| (t.attribute("alphabet").unwrap(), t.attribute("ph").unwrap()))
        .collect::<Vec<_>>();
    assert_eq!(
        phonemes,
        vec![
            ("ipa", "ˈlɑ ˈviːɾə ˈʔeɪ ˈbɛlə"),
            ("ipa", "ɹəˈbɛːɹɾoʊ bɛˈniːnji"),
        ]
    );

    // the phonetic spelling is never spoken, only the contained text
    let processed = process(&result);
    assert_eq!(
        texts(&processed.segments),
        vec![
            "The title of the movie is:",
            "La vita è bella",
            "(Life is beautiful), which is directed by",
            "Roberto Benigni",
        ]
    );
}

#[test]
fn google_tts_example() {
    let ssml = r#"<speak>
          Here are <say-as interpret-as="characters">SSML</say-as> samples.
          I can pause <break time="3s"/>.
          I can play a sound
          <audio src="https://www.example.com/MY_MP3_FILE.mp3">didn't get your MP3 audio file</audio>.
          I can speak in cardinals. Your number is <say-as interpret-as="cardinal">10</say-as>.
          Or I can speak in ordinals. You are <say-as interpret-as="ordinal">10</say-as> in line.
          Or I can even speak in digits. The digits for ten are <say-as interpret-as="characters">10</say-as>.
          I can also substitute phrases, like the <sub alias="World Wide Web Consortium">W3C</sub>.
          Finally, I can speak a paragraph with two sentences.
          <p><s>This is sentence one.</s><s>This is sentence two.</s></p>
        </speak>"#;
    let result = parse(ssml);
    assert_eq!(
        result.plain_text(),
        r#"Here are SSML samples. I can pause. I can play a sound didn't get your MP3 audio file. I can speak in cardinals. Your number is 10. Or I can speak in ordinals. You are 10 in line. Or I can even speak in digits. The digits for ten are 10. I can also substitute phrases, like the W3C. Finally, I can speak a paragraph with two sentences. This is sentence one. This is sentence two."#
    );

    let processed = process(&result);
    let segments = texts(&processed.segments);
    assert_eq!(segments[1], "S S M L");
    assert!(segments.contains(&"ten"));
    assert!(segments.contains(&"1 0"));
    assert!(segments.contains(&"World Wide Web Consortium"));
    assert!(!segments.contains(&"W3C"));
    assert!(segments.contains(&"didn't get your MP3 audio file"));
    // ordinals aren't verbalised
    assert_eq!(segments.iter().filter(|s| **s == "10").count(), 1);

    let pause = processed
        .segments
        .iter()
        .find(|s| s.is_pause())
        .unwrap();
    assert_approx_eq!(pause.settings.pause.unwrap(), 3.0);
}

#[test]
fn microsoft_custom_tags() {
    let ssml = r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="string">
    <mstts:backgroundaudio src="string" volume="string" fadein="string" fadeout="string"/>
    <voice name="string">
        <audio src="string"></audio>
        <bookmark mark="string"/>
        <break strength="medium" time="5s" />
        <emphasis level="reduced"></emphasis>
        <lang xml:lang="string"></lang>
        <lexicon xml:id="some_id" uri="string"/>
        <math xmlns="http://www.w3.org/1998/Math/MathML"></math>
        <mstts:express-as style="string" styledegree="value" role="string"></mstts:express-as>
        <mstts:silence type="string" value="string"/>
        <mstts:viseme type="string"/>
        <p></p>
        <phoneme alphabet="string" ph="string"></phoneme>
        <prosody pitch="2.2Hz" contour="(0%,+20Hz) (10%,+30Hz) (40%,+10Hz)" range="-2Hz" rate="20%" volume="2dB"></prosody>
        <s></s>
        <say-as interpret-as="string" format="string" detail="string"></say-as>
        <sub alias="string"></sub>
    </voice>
</speak>"#;
    let result = parse(ssml);
    assert_eq!(result.plain_text(), "");

    let expected: Vec<SsmlElement> = {
        use SsmlElement::*;
        vec![
            Speak,
            Other("backgroundaudio".to_string()),
            Other("voice".to_string()),
            Other("audio".to_string()),
            Other("bookmark".to_string()),
            Break,
            Emphasis,
            Other("lang".to_string()),
            Other("lexicon".to_string()),
            Other("math".to_string()),
            Other("express-as".to_string()),
            Other("silence".to_string()),
            Other("viseme".to_string()),
            Paragraph,
            Phoneme,
            Prosody,
            Sentence,
            SayAs,
            Sub,
        ]
    };
    assert_eq!(kinds(result.elements()), expected);

    let processed = process(&result);
    assert_eq!(
        processed.segments,
        vec![
            Segment::new(" ", SpeechSettings::new().with_pause(5.0)),
            Segment::new(" ", SpeechSettings::new().with_pause(0.5)),
            Segment::new("string", SpeechSettings::new()),
        ]
    );
}

#[test]
fn prosody_settings_merge_field_by_field() {
    let config = ParserConfigBuilder::default()
        .tag_matching(TagMatching::Balanced)
        .build()
        .unwrap();
    let result = parse_with(
        r#"<prosody rate="fast"><prosody pitch="high">X</prosody></prosody>"#,
        &config,
    );
    let processed = process_with(&result, &config);
    assert_eq!(processed.segments.len(), 1);
    let settings = processed.segments[0].settings;
    assert_approx_eq!(settings.rate.unwrap(), 1.25);
    assert_approx_eq!(settings.pitch.unwrap(), 1.25);
}

#[test]
fn malformed_markup_degrades() {
    let result = parse("<speak>unclosed <emphasis>text");
    assert!(!result.plain_text().is_empty());
    assert!(!result.plain_text().contains('<'));

    let processed = process(&result);
    assert!(!processed.segments.is_empty());
    assert!(processed.segments.iter().all(|s| !s.text.contains('<')));
}

#[test]
fn say_as_in_context() {
    let result = parse(
        r#"Call <say-as interpret-as="telephone">15551234567</say-as> before
        <say-as interpret-as="time">17:30</say-as> on <say-as interpret-as="date">2025-01-09</say-as>,
        it costs <say-as interpret-as="currency">12.5</say-as>. Code <say-as interpret-as="digits">a1b2</say-as>."#,
    );
    let processed = process(&result);
    assert_eq!(
        processed.text,
        "Call 1-555-123-4567 before 5:30 PM on January 9, 2025 , it costs $12.50 . Code a one b two ."
    );
}
