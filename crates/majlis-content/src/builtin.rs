//! Built-in Arabic content shipped with the binary

pub const QUESTIONS: &[&str] = &[
    "لو تقدر تسافر لأي مكان بالعالم الحين، وين تروح؟",
    "وش أكثر شيء تندم إنك ما سويته؟",
    "مين أقرب شخص لقلبك في هذي القروب؟",
    "وش الشي اللي يضحكك مهما كان مزاجك؟",
    "لو تقدر تغير شي واحد في حياتك، وش بيكون؟",
    "وش أجمل ذكرى من طفولتك؟",
    "وش الأكلة اللي ما تمل منها أبداً؟",
    "لو صار عندك يوم إجازة كامل بدون جوال، وش تسوي؟",
    "وش الصفة اللي تحبها في نفسك؟",
    "مين الشخص اللي تتمنى تقابله ولو لمرة؟",
];

pub const CHALLENGES: &[&str] = &[
    "أرسل آخر صورة في ألبومك 📸",
    "اكتب اسمك بيدك اليسار وأرسله صورة ✍️",
    "قل نكتة للقروب والحين 😂",
    "أرسل رسالة صوتية تغني فيها مقطع من أغنية تحبها 🎤",
    "اكتب بيت شعر من تأليفك 📝",
    "غير صورة بروفايلك لمدة ساعة لصورة يختارها القروب 🖼️",
    "امدح كل شخص في القروب بكلمة وحدة 💐",
    "أرسل آخر إيموجي استخدمته عشر مرات 🔁",
    "احكِ موقف محرج صار لك هالأسبوع 🙈",
    "صور المنظر اللي قدامك الحين وأرسله 🌅",
];

pub const MENTIONS: &[&str] = &[
    "منشن شخص تحب تسافر معه ✈️",
    "منشن أكثر شخص يضحكك 😂",
    "منشن شخص تثق فيه ثقة عمياء 🤝",
    "منشن شخص ودك تشوفه الحين 👀",
    "منشن أطيب شخص في القروب 💛",
    "منشن شخص دايم يتأخر عن المواعيد ⏰",
    "منشن شخص تستشيره في قراراتك المهمة 🧠",
    "منشن شخص تتمنى يكون أخوك 👬",
];

pub const CONFESSIONS: &[&str] = &[
    "اعترف: وش أغرب عادة عندك؟",
    "اعترف: مين آخر شخص زعلت منه؟",
    "اعترف: وش الكذبة اللي قلتها وصدقها الكل؟",
    "اعترف: وش الشي اللي تخاف منه وما تقوله لأحد؟",
    "اعترف: هل سبق وتجاهلت رسالة أحد هنا؟",
    "اعترف: وش أكثر تطبيق تضيع فيه وقتك؟",
    "اعترف: مين الشخص اللي تشتاق له الحين؟",
    "اعترف: وش آخر شي بكيت عشانه؟",
];

pub const SITUATIONS: &[&str] = &[
    "موقف: لقيت محفظة فيها مبلغ كبير بالشارع، وش تسوي؟",
    "موقف: صديقك طلب منك سلفة وأنت ما تبي تعطيه، كيف ترد؟",
    "موقف: سمعت أحد يتكلم عنك بالغلط، وش ردة فعلك؟",
    "موقف: انقطعت الكهرباء وأنت لحالك بالبيت بالليل، وش تسوي؟",
    "موقف: وصلك عرض شغل ممتاز بمدينة ثانية، تقبل؟",
    "موقف: نسيت موعد مهم لشخص عزيز عليك، كيف تعتذر؟",
    "موقف: أحد غريب طلب رقمك في مكان عام، وش تقول؟",
    "موقف: صحيت ولقيت نفسك مليونير، أول شي تسويه؟",
];

/// (question, answer, hint)
pub const RIDDLES: &[(&str, &str, &str)] = &[
    ("شيء كلما أخذت منه كبر، فما هو؟", "الحفرة", "تلقاه في الأرض"),
    ("له أسنان ولا يعض، فما هو؟", "المشط", "تستخدمه كل صباح"),
    ("شيء يمشي بلا رجلين ويبكي بلا عينين؟", "السحاب", "تشوفه في السماء"),
    ("ما هو الشيء الذي يكتب ولا يقرأ؟", "القلم", "أداة مدرسية"),
    ("بيت بلا أبواب ولا نوافذ، فما هو؟", "البيضة", "تطلع منه حياة"),
    ("شيء تملكه لكن غيرك يستخدمه أكثر منك؟", "اسمك", "ينادونك فيه"),
    ("ما هو الشيء الذي يتكلم جميع اللغات؟", "الصدى", "تسمعه في الجبال"),
    ("شيء له عين ولا يرى؟", "الإبرة", "تستخدم في الخياطة"),
];

/// (trait name, description)
pub const PERSONALITY_TRAITS: &[(&str, &str)] = &[
    ("القائد 👑", "شخصيتك قيادية، تحب تاخذ القرار وتتحمل المسؤولية والناس ترتاح لوجودك."),
    ("الفنان 🎨", "عندك حس إبداعي عالي وتشوف الجمال في التفاصيل الصغيرة."),
    ("الحكيم 🦉", "هادي ومتزن، والكل يرجع لك لما يحتار في قرار."),
    ("المغامر 🧗", "تحب التجارب الجديدة وما تخاف من المجهول."),
    ("الاجتماعي 🤗", "روح القروب، تعرف تكسب الناس بسرعة وتحب اللمة."),
    ("المفكر 🧠", "تحلل كل شي بعمق وتحب تفهم أسباب الأمور."),
    ("الطيب 💛", "قلبك أبيض وتحب تساعد الكل بدون مقابل."),
    ("المرح 😄", "ضحكتك معدية وتحول أي جلسة لجو حلو."),
];
